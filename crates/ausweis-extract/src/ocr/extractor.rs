// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runs the OCR rule cascade over front-of-card text.

use std::collections::BTreeMap;

use ausweis_core::config::ExtractionConfig;
use ausweis_core::{Field, FieldMap};
use serde::Serialize;
use tracing::{debug, instrument};

use super::rules::{PatternRule, RULES};

/// A later rule that matched an already-filled field with a different value.
///
/// Values are not recorded; only which rules disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub field: Field,
    pub kept_rule: &'static str,
    pub rejected_rule: &'static str,
}

/// Fields plus the disagreements seen while extracting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrExtraction {
    pub fields: FieldMap,
    pub ambiguities: Vec<Ambiguity>,
}

/// Cascade state threaded through the rule fold.
#[derive(Default)]
struct Cascade {
    fields: FieldMap,
    winners: BTreeMap<Field, &'static str>,
    ambiguities: Vec<Ambiguity>,
}

impl Cascade {
    fn offer(mut self, rule: &PatternRule, value: String) -> Self {
        match (self.fields.get(&rule.field), self.winners.get(&rule.field)) {
            (Some(existing), Some(kept)) => {
                if existing != value {
                    self.ambiguities.push(Ambiguity {
                        field: rule.field.clone(),
                        kept_rule: *kept,
                        rejected_rule: rule.id,
                    });
                }
                self
            }
            _ => {
                debug!(rule = rule.id, field = %rule.field, "OCR rule matched");
                self.winners.insert(rule.field.clone(), rule.id);
                Self {
                    fields: self.fields.with(rule.field.clone(), value),
                    ..self
                }
            }
        }
    }
}

/// Extracts identity fields from OCR text.
#[derive(Debug, Clone, Default)]
pub struct OcrExtractor {
    config: ExtractionConfig,
}

impl OcrExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract fields. Empty text yields an empty map.
    pub fn extract(&self, text: &str) -> FieldMap {
        self.extract_detailed(text).fields
    }

    /// Extract fields and report rule disagreements.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn extract_detailed(&self, text: &str) -> OcrExtraction {
        if text.trim().is_empty() {
            return OcrExtraction::default();
        }

        let cascade = RULES.iter().fold(Cascade::default(), |cascade, rule| {
            match first_rendering(rule, text, &self.config) {
                Some(value) => cascade.offer(rule, value),
                None => cascade,
            }
        });

        let fields = cascade.fields.with_consolidated_name();
        debug!(
            fields = fields.len(),
            ambiguities = cascade.ambiguities.len(),
            "OCR extraction finished"
        );
        OcrExtraction {
            fields,
            ambiguities: cascade.ambiguities,
        }
    }
}

/// First match of `rule` that renders a value.
///
/// Rejected matches resume one character further on, so a run that starts
/// with a label word does not hide a valid run overlapping it.
fn first_rendering(rule: &PatternRule, text: &str, config: &ExtractionConfig) -> Option<String> {
    let mut start = 0;
    while start <= text.len() {
        let caps = rule.pattern.captures_at(text, start)?;
        let whole = caps.get(0)?;
        if !rule.is_rejected_at(text, whole.start()) {
            if let Some(value) = (rule.render)(&caps, config) {
                return Some(value);
            }
        }
        start = whole.start()
            + text[whole.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }
    None
}

/// Extract with the default configuration.
pub fn extract(text: &str) -> FieldMap {
    OcrExtractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausweis_core::config::SexPolicy;

    const CA_FRONT: &str = "CALIFORNIA DRIVER LICENSE\n\
        DL C5494170\n\
        EXP 01/13/2015\n\
        SMITH JOHN ALLEN\n\
        123 MAIN ST\n\
        SACRAMENTO, CA 95818\n\
        DOB 01/13/1976\n\
        RSTR NONE\n\
        CLASS C END NONE\n\
        SEX M 5'-09\" 185 lb BLU\n\
        ISS 08/31/2009";

    #[test]
    fn california_front_extracts_every_printed_field() {
        let fields = extract(CA_FRONT);
        let get = |field: Field| fields.get(&field);

        assert_eq!(get(Field::Name), Some("John Allen Smith"));
        assert_eq!(get(Field::FirstName), Some("John"));
        assert_eq!(get(Field::MiddleName), Some("Allen"));
        assert_eq!(get(Field::LastName), Some("Smith"));
        assert_eq!(get(Field::DriverLicenseNumber), Some("C5494170"));
        assert_eq!(get(Field::DateOfBirth), Some("01/13/1976"));
        assert_eq!(get(Field::ExpirationDate), Some("01/13/2015"));
        assert_eq!(get(Field::IssueDate), Some("08/31/2009"));
        assert_eq!(get(Field::State), Some("CA"));
        assert_eq!(get(Field::Address), Some("123 Main St"));
        assert_eq!(get(Field::City), Some("Sacramento"));
        assert_eq!(get(Field::ZipCode), Some("95818"));
        assert_eq!(get(Field::Class), Some("C"));
        assert_eq!(get(Field::Restrictions), None);
        assert_eq!(get(Field::Endorsements), None);
    }

    #[test]
    fn physical_descriptors_survive_ocr_artifacts() {
        let fields = extract("SEX M 5'-09\" 185 lb BLU");
        assert_eq!(fields.get(&Field::Sex), Some("Male"));
        assert_eq!(
            fields.get(&Field::Height),
            Some("5'9\" (69\")")
        );
        assert_eq!(fields.get(&Field::Weight), Some("185 lbs"));
        assert_eq!(fields.get(&Field::EyeColor), Some("Blu"));
    }

    #[test]
    fn empty_text_yields_empty_map() {
        assert!(extract("").is_empty());
        assert!(extract("   \n ").is_empty());
    }

    #[test]
    fn label_run_does_not_hide_overlapping_name() {
        let fields = extract("DL SMITH JOHN ALLEN");
        assert_eq!(
            fields.get(&Field::Name),
            Some("John Allen Smith")
        );
    }

    #[test]
    fn numbered_labels_supply_name_parts() {
        let fields = extract("1 GARCIA\n2 MARIA ELENA\nDOB 02/03/1990");
        assert_eq!(fields.get(&Field::LastName), Some("Garcia"));
        assert_eq!(fields.get(&Field::FirstName), Some("Maria"));
        assert_eq!(fields.get(&Field::MiddleName), Some("Elena"));
        assert_eq!(
            fields.get(&Field::Name),
            Some("Maria Elena Garcia")
        );
    }

    #[test]
    fn hair_label_keeps_color_out_of_eyes() {
        let fields = extract("HAIR BRO EYES GRN");
        assert_eq!(fields.get(&Field::EyeColor), Some("Grn"));
        assert_eq!(fields.get(&Field::HairColor), Some("Bro"));
    }

    #[test]
    fn color_surname_is_not_read_as_eye_color() {
        let fields = extract("GREEN JOHN ALLEN\nEYES BLU");
        assert_eq!(fields.get(&Field::LastName), Some("Green"));
        assert_eq!(fields.get(&Field::EyeColor), Some("Blu"));
    }

    #[test]
    fn first_height_form_wins_and_disagreement_is_reported() {
        let extraction = OcrExtractor::default().extract_detailed("5'-09\" HGT 6-01");
        assert_eq!(
            extraction.fields.get(&Field::Height),
            Some("5'9\" (69\")")
        );
        assert!(extraction.ambiguities.contains(&Ambiguity {
            field: Field::Height,
            kept_rule: "height.artifact",
            rejected_rule: "height.label",
        }));
    }

    #[test]
    fn agreeing_rules_are_not_ambiguous() {
        let extraction = OcrExtractor::default().extract_detailed("EYES BLU");
        assert_eq!(
            extraction.fields.get(&Field::EyeColor),
            Some("Blu")
        );
        assert!(extraction.ambiguities.is_empty());
    }

    #[test]
    fn sex_label_orders_and_artifact() {
        assert_eq!(
            extract("F SEX").get(&Field::Sex),
            Some("Female")
        );
        assert_eq!(
            extract("SEX: F").get(&Field::Sex),
            Some("Female")
        );
    }

    #[test]
    fn explicit_sex_policy_is_honoured() {
        let config = ExtractionConfig {
            sex_policy: SexPolicy::Explicit,
            ..ExtractionConfig::default()
        };
        let fields = OcrExtractor::new(config).extract("SEX F");
        assert_eq!(fields.get(&Field::Sex), Some("Female"));
    }

    #[test]
    fn flags_and_compliance() {
        let fields = extract("VETERAN\nORGAN DONOR\nFEDERAL LIMITS APPLY");
        assert_eq!(fields.get(&Field::Veteran), Some("Yes"));
        assert_eq!(fields.get(&Field::OrganDonor), Some("Yes"));
        assert_eq!(fields.get(&Field::RealId), Some("No"));
    }

    #[test]
    fn labelled_weight_and_height_in_inches() {
        let fields = extract("HGT 069 WGT 150");
        assert_eq!(
            fields.get(&Field::Height),
            Some("5'9\" (69\")")
        );
        assert_eq!(fields.get(&Field::Weight), Some("150 lbs"));
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(extract(CA_FRONT), extract(CA_FRONT));
    }
}
