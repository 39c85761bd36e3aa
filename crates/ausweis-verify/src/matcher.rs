// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cross-document matcher.
//
// Scores how well the fields read from the front of a card agree with those
// decoded from its barcode. Structured pairs are weighted by how much they
// discriminate between holders; raw lexical overlap between the two texts adds
// a capped bonus so that a failed extraction on one side still leaves signal.
// The matcher is total: empty inputs score near zero, they never fail.

use std::collections::BTreeSet;

use ausweis_core::config::MatchingConfig;
use ausweis_core::{
    ConfidenceLevel, Field, FieldMap, FieldMatchResult, MatchClassification, MatchReport,
};
use rapidfuzz::distance::levenshtein;
use tracing::{debug, instrument};

/// One row of the weighted mapping table.
#[derive(Debug, Clone)]
pub struct FieldPairing {
    pub front: Field,
    pub barcode: Field,
    pub weight: u32,
}

const fn pairing(front: Field, barcode: Field, weight: u32) -> FieldPairing {
    FieldPairing {
        front,
        barcode,
        weight,
    }
}

/// Weighted front/barcode pairs. License number and date of birth
/// discriminate most; class least.
pub static FIELD_PAIRINGS: [FieldPairing; 15] = [
    pairing(Field::DriverLicenseNumber, Field::LicenseNumber, 25),
    pairing(Field::DateOfBirth, Field::DateOfBirth, 20),
    pairing(Field::LastName, Field::LastName, 15),
    pairing(Field::FirstName, Field::FirstName, 15),
    pairing(Field::ExpirationDate, Field::ExpirationDate, 15),
    pairing(Field::IssueDate, Field::IssueDate, 10),
    pairing(Field::Address, Field::Address, 10),
    pairing(Field::Sex, Field::Sex, 10),
    pairing(Field::Height, Field::Height, 10),
    pairing(Field::City, Field::City, 8),
    pairing(Field::State, Field::State, 8),
    pairing(Field::ZipCode, Field::ZipCode, 8),
    pairing(Field::EyeColor, Field::EyeColor, 6),
    pairing(Field::Weight, Field::Weight, 6),
    pairing(Field::Class, Field::Class, 5),
];

/// Minimum length of a word counted towards lexical overlap.
const SIGNIFICANT_WORD_LEN: usize = 3;

// -- Comparison primitives ----------------------------------------------------

/// Lower-case and keep only alphanumerics, so `01/13/1976` equals `01131976`.
pub fn normalize_for_comparison(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `1 - levenshtein / max_len` over normalized values, in `0.0..=1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize_for_comparison(a), normalize_for_comparison(b));
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / longest as f64
}

/// Case-folded words of at least three characters, punctuation trimmed.
pub fn significant_words(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().count() >= SIGNIFICANT_WORD_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Number of significant words the two texts share.
pub fn word_overlap(front_text: &str, barcode_text: &str) -> usize {
    let front = significant_words(front_text);
    significant_words(barcode_text)
        .intersection(&front)
        .count()
}

// -- Matcher ------------------------------------------------------------------

/// Compares front and barcode field sets.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Table weights plus the word-overlap ceiling.
    pub fn max_possible_score(&self) -> u32 {
        FIELD_PAIRINGS
            .iter()
            .map(|pair| pair.weight)
            .sum::<u32>()
            .saturating_add(self.config.word_overlap_ceiling())
    }

    /// Classify one pair of optional values.
    ///
    /// A value with nothing left after normalization counts as absent.
    pub fn classify(&self, front: Option<&str>, barcode: Option<&str>) -> MatchClassification {
        let comparable = |value: &str| !normalize_for_comparison(value).is_empty();
        match (front.filter(|v| comparable(v)), barcode.filter(|v| comparable(v))) {
            (None, None) => MatchClassification::Missing,
            (Some(_), None) => MatchClassification::FrontOnly,
            (None, Some(_)) => MatchClassification::BarcodeOnly,
            (Some(front), Some(barcode)) => {
                if normalize_for_comparison(front) == normalize_for_comparison(barcode) {
                    return MatchClassification::Match;
                }
                let similarity = similarity(front, barcode);
                if similarity > self.config.partial_threshold {
                    MatchClassification::PartialMatch { similarity }
                } else {
                    MatchClassification::Mismatch { similarity }
                }
            }
        }
    }

    fn score_pair(
        &self,
        pair: &FieldPairing,
        front: &FieldMap,
        barcode: &FieldMap,
    ) -> FieldMatchResult {
        let front_value = front.get(&pair.front);
        let barcode_value = barcode.get(&pair.barcode);
        let classification = self.classify(front_value, barcode_value);
        let points = classification
            .similarity()
            .map_or(0.0, |ratio| f64::from(pair.weight) * ratio.max(0.0));

        FieldMatchResult {
            front_key: pair.front.clone(),
            barcode_key: pair.barcode.clone(),
            front_value: front_value.map(str::to_string),
            barcode_value: barcode_value.map(str::to_string),
            classification,
            weight: pair.weight,
            points,
        }
    }

    /// Score the agreement between the two sides of one card.
    #[instrument(skip_all)]
    pub fn compare(
        &self,
        front: &FieldMap,
        barcode: &FieldMap,
        raw_front: &str,
        raw_barcode: &str,
    ) -> MatchReport {
        let field_results: Vec<FieldMatchResult> = FIELD_PAIRINGS
            .iter()
            .map(|pair| self.score_pair(pair, front, barcode))
            .collect();

        let word_overlap_count = word_overlap(raw_front, raw_barcode);
        let capped_words = word_overlap_count.min(self.config.max_word_matches as usize);
        let word_points = capped_words as f64 * f64::from(self.config.points_per_word);

        let field_points: f64 = field_results.iter().map(|result| result.points).sum();
        let points_awarded = field_points + word_points;
        let max_possible_score = self.max_possible_score();

        let overall_score_percent = if max_possible_score == 0 {
            0
        } else {
            (100.0 * points_awarded / f64::from(max_possible_score))
                .round()
                .clamp(0.0, 100.0) as u8
        };
        let confidence_level = ConfidenceLevel::from_percent(overall_score_percent);

        debug!(
            overall_score_percent,
            word_overlap_count,
            %confidence_level,
            "Documents compared"
        );

        MatchReport {
            overall_score_percent,
            field_results,
            word_overlap_count,
            confidence_level,
            points_awarded,
            max_possible_score,
        }
    }
}

/// Compare with the default matching parameters.
pub fn compare(
    front: &FieldMap,
    barcode: &FieldMap,
    raw_front: &str,
    raw_barcode: &str,
) -> MatchReport {
    Matcher::default().compare(front, barcode, raw_front, raw_barcode)
}

// -- Tests --------------------------------------------------------------------
