// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Ausweis validation engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical name of a piece of license data, independent of which source
/// surfaced it.
///
/// The vocabulary is closed; [`Field::Other`] carries unrecognised barcode
/// element codes so that nothing decoded is silently dropped. On the wire a
/// field is always its display label (e.g. `"Date of Birth"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    FirstName,
    MiddleName,
    LastName,
    DateOfBirth,
    /// License number as printed on the front of the card.
    DriverLicenseNumber,
    /// License number as encoded in the barcode (`DAQ`).
    LicenseNumber,
    Sex,
    Height,
    Weight,
    EyeColor,
    HairColor,
    Address,
    City,
    State,
    ZipCode,
    Class,
    Restrictions,
    Endorsements,
    IssueDate,
    ExpirationDate,
    Veteran,
    OrganDonor,
    RealId,
    /// Title-cased rendering of an unrecognised element code.
    Other(String),
}

impl Field {
    /// Every field of the closed vocabulary, in display order.
    pub const KNOWN: [Field; 24] = [
        Field::Name,
        Field::FirstName,
        Field::MiddleName,
        Field::LastName,
        Field::DateOfBirth,
        Field::DriverLicenseNumber,
        Field::LicenseNumber,
        Field::Sex,
        Field::Height,
        Field::Weight,
        Field::EyeColor,
        Field::HairColor,
        Field::Address,
        Field::City,
        Field::State,
        Field::ZipCode,
        Field::Class,
        Field::Restrictions,
        Field::Endorsements,
        Field::IssueDate,
        Field::ExpirationDate,
        Field::Veteran,
        Field::OrganDonor,
        Field::RealId,
    ];

    /// Display label used by callers and in serialized output.
    pub fn label(&self) -> &str {
        match self {
            Self::Name => "Name",
            Self::FirstName => "First Name",
            Self::MiddleName => "Middle Name",
            Self::LastName => "Last Name",
            Self::DateOfBirth => "Date of Birth",
            Self::DriverLicenseNumber => "Driver License Number",
            Self::LicenseNumber => "License Number",
            Self::Sex => "Sex",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::EyeColor => "Eye Color",
            Self::HairColor => "Hair Color",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP Code",
            Self::Class => "Class",
            Self::Restrictions => "Restrictions",
            Self::Endorsements => "Endorsements",
            Self::IssueDate => "Issue Date",
            Self::ExpirationDate => "Expiration Date",
            Self::Veteran => "Veteran",
            Self::OrganDonor => "Organ Donor",
            Self::RealId => "REAL ID",
            Self::Other(label) => label,
        }
    }

    /// Resolve a display label. Labels outside the closed vocabulary become
    /// [`Field::Other`].
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|field| field.label() == label)
            .cloned()
            .unwrap_or_else(|| Self::Other(label.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Normalized fields derived from one source.
///
/// A key is present only if the source positively matched it; there are no
/// placeholder values. Backed by a `BTreeMap` so iteration and serialization
/// order never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<Field, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from display labels, e.g. `[("Date of Birth", "01/13/1976")]`.
    pub fn from_labels<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        entries.into_iter().fold(Self::new(), |map, (label, value)| {
            map.with(Field::from_label(label.as_ref()), value)
        })
    }

    pub fn get(&self, field: &Field) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Look a value up by its display label.
    pub fn get_label(&self, label: &str) -> Option<&str> {
        self.get(&Field::from_label(label))
    }

    pub fn contains(&self, field: &Field) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &str)> {
        self.0.iter().map(|(field, value)| (field, value.as_str()))
    }

    /// Return a map with `field` set to `value`, replacing any existing value.
    ///
    /// Blank values are not admitted: absence means "not found".
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.0.insert(field, value);
        }
        self
    }

    /// Return a map with `field` set to `value` only if it was absent.
    pub fn with_missing(self, field: Field, value: impl Into<String>) -> Self {
        if self.contains(&field) {
            self
        } else {
            self.with(field, value)
        }
    }

    /// Merge `other` into this map without overwriting anything already set.
    pub fn merge_missing(self, other: FieldMap) -> Self {
        other
            .0
            .into_iter()
            .fold(self, |map, (field, value)| map.with_missing(field, value))
    }

    /// Derive a single [`Field::Name`].
    ///
    /// An explicit full name wins; otherwise the name is composed as
    /// `First [Middle] Last` from whichever parts are present.
    pub fn with_consolidated_name(self) -> Self {
        if self.contains(&Field::Name) {
            return self;
        }
        let composed = [Field::FirstName, Field::MiddleName, Field::LastName]
            .iter()
            .filter_map(|part| self.get(part))
            .collect::<Vec<_>>()
            .join(" ");
        self.with(Field::Name, composed)
    }

    /// Label-keyed view for presentation layers that predate [`Field`].
    pub fn labeled(&self) -> BTreeMap<&str, &str> {
        self.iter()
            .map(|(field, value)| (field.label(), value))
            .collect()
    }
}

impl FromIterator<(Field, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (field, value)| map.with(field, value))
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a Field, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, Field, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The two raw captures for one validation attempt.
///
/// Either side may be absent when that capture failed upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocumentInput {
    /// Free text recognised from the front of the card.
    pub ocr_text: Option<String>,
    /// Payload decoded from the PDF417/QR symbol on the back.
    pub barcode_payload: Option<String>,
}

impl RawDocumentInput {
    pub fn new(ocr_text: Option<String>, barcode_payload: Option<String>) -> Self {
        Self {
            ocr_text,
            barcode_payload,
        }
    }

    pub fn both(ocr_text: impl Into<String>, barcode_payload: impl Into<String>) -> Self {
        Self::new(Some(ocr_text.into()), Some(barcode_payload.into()))
    }

    /// OCR text, or `""` when absent.
    pub fn ocr_text(&self) -> &str {
        self.ocr_text.as_deref().unwrap_or_default()
    }

    /// Barcode payload, or `""` when absent.
    pub fn barcode_payload(&self) -> &str {
        self.barcode_payload.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.ocr_text().trim().is_empty() && self.barcode_payload().trim().is_empty()
    }
}

/// How one front/barcode field pair compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchClassification {
    /// Normalized values are equal.
    Match,
    /// Values differ but are similar above the partial threshold.
    PartialMatch { similarity: f64 },
    /// Values differ and are not similar enough to be the same reading.
    Mismatch { similarity: f64 },
    /// Only the front produced a value.
    FrontOnly,
    /// Only the barcode produced a value.
    BarcodeOnly,
    /// Neither side produced a value.
    Missing,
}

impl MatchClassification {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }

    /// Similarity ratio for compared pairs (1.0 for an exact match).
    pub fn similarity(&self) -> Option<f64> {
        match self {
            Self::Match => Some(1.0),
            Self::PartialMatch { similarity } | Self::Mismatch { similarity } => {
                Some(*similarity)
            }
            Self::FrontOnly | Self::BarcodeOnly | Self::Missing => None,
        }
    }
}

/// Per-pair outcome in a [`MatchReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatchResult {
    pub front_key: Field,
    pub barcode_key: Field,
    pub front_value: Option<String>,
    pub barcode_value: Option<String>,
    pub classification: MatchClassification,
    /// Table weight of this pair.
    pub weight: u32,
    /// Points awarded towards the overall score.
    pub points: f64,
}

/// Discrete summary of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Bucket a 0-100 score.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            90.. => Self::VeryHigh,
            75..=89 => Self::High,
            60..=74 => Self::Medium,
            40..=59 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }

    /// Whether a result at this level should go to a person.
    pub fn needs_review(&self) -> bool {
        matches!(self, Self::Low | Self::VeryLow)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted agreement between the front and barcode field sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// `round(100 * points / max_possible_score)`, always within 0-100.
    pub overall_score_percent: u8,
    pub field_results: Vec<FieldMatchResult>,
    /// Significant words shared by the two raw texts (uncapped).
    pub word_overlap_count: usize,
    pub confidence_level: ConfidenceLevel,
    /// Points from field pairs plus the word-overlap bonus.
    pub points_awarded: f64,
    /// Sum of all table weights plus the word-overlap ceiling.
    pub max_possible_score: u32,
}

impl MatchReport {
    /// Results classified as [`MatchClassification::Mismatch`].
    pub fn mismatches(&self) -> impl Iterator<Item = &FieldMatchResult> {
        self.field_results
            .iter()
            .filter(|result| result.classification.is_mismatch())
    }

    pub fn match_count(&self) -> usize {
        self.field_results
            .iter()
            .filter(|result| result.classification.is_match())
            .count()
    }
}
