// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end checks across decoding, extraction, matching and review advice.

use ausweis_core::review::Severity;
use ausweis_core::{
    ConfidenceLevel, EngineConfig, Field, FieldMap, MatchClassification, RawDocumentInput,
};
use ausweis_extract::barcode::{self, Dialect, detect_dialect};
use ausweis_extract::normalize::to_proper_case;
use ausweis_extract::ocr;
use ausweis_verify::matcher::FIELD_PAIRINGS;
use ausweis_verify::{compare, validate};
use chrono::NaiveDate;
use proptest::prelude::*;

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

const CA_BARCODE: &str = "@\n\u{1e}\rANSI 636014040002DL00410278ZC03190024DLDAQC5494170\n\
    DCSSMITH\n\
    DACJOHN\n\
    DADALLEN\n\
    DCAC\n\
    DCBNONE\n\
    DCDNONE\n\
    DBD08312009\n\
    DBB01131976\n\
    DBA01132015\n\
    DBC1\n\
    DAU069 IN\n\
    DAYBLU\n\
    DAG123 MAIN ST\n\
    DAISACRAMENTO\n\
    DAJCA\n\
    DAK958180000\n\
    DAW185\n";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

fn result_for<'r>(
    report: &'r ausweis_core::MatchReport,
    field: &Field,
) -> &'r ausweis_core::FieldMatchResult {
    report
        .field_results
        .iter()
        .find(|result| &result.front_key == field)
        .expect("pairing present")
}

// -- Concrete scenarios -------------------------------------------------------

#[test]
fn ansi_date_of_birth_is_reformatted() {
    let fields = barcode::decode("ANSI 636014040002DL\nDBB01131976\n");
    assert_eq!(fields.get_label("Date of Birth"), Some("01/13/1976"));
}

#[test]
fn noisy_physical_line_is_read() {
    let fields = ocr::extract("ISS 08/31/2009 SEX M 5'-09\" 185 lb BLU CLASS C");
    assert_eq!(fields.get_label("Sex"), Some("Male"));
    assert_eq!(fields.get_label("Height"), Some("5'9\" (69\")"));
    assert_eq!(fields.get_label("Weight"), Some("185 lbs"));
    assert_eq!(fields.get_label("Eye Color"), Some("Blu"));
}

#[test]
fn equal_dates_of_birth_earn_full_weight() {
    let front = FieldMap::from_labels([("Date of Birth", "01/13/1976")]);
    let barcode = FieldMap::from_labels([("Date of Birth", "01/13/1976")]);
    let report = compare(&front, &barcode, "", "");
    let dob = result_for(&report, &Field::DateOfBirth);
    assert_eq!(dob.classification, MatchClassification::Match);
    assert_eq!(dob.weight, 20);
    assert_eq!(dob.points, 20.0);
}

#[test]
fn one_digit_license_difference_is_partial() {
    let front = FieldMap::from_labels([("Driver License Number", "C549417")]);
    let barcode = FieldMap::from_labels([("License Number", "C549418")]);
    let report = compare(&front, &barcode, "", "");
    let license = result_for(&report, &Field::DriverLicenseNumber);
    match license.classification {
        MatchClassification::PartialMatch { similarity } => {
            assert!(similarity > 0.7 && similarity < 1.0);
        }
        other => panic!("expected a partial match, got {other:?}"),
    }
    assert!(license.points > 0.0 && license.points < f64::from(license.weight));
}

#[test]
fn shared_words_score_without_structured_fields() {
    let words = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo";
    let input = RawDocumentInput::both(words, words);
    let outcome = validate(&input, &EngineConfig::default(), today()).expect("outcome");
    assert!(outcome.front_fields.is_empty());
    assert!(outcome.barcode_fields.is_empty());
    assert_eq!(outcome.report.word_overlap_count, 11);
    assert_eq!(outcome.report.match_count(), 0);
    assert_eq!(outcome.report.points_awarded, 22.0);
    assert_eq!(outcome.report.overall_score_percent, 11);
}

// -- Whole-card behaviour -----------------------------------------------------

#[test]
fn consistent_card_is_cleared() {
    let input = RawDocumentInput::both(CA_FRONT, CA_BARCODE);
    let outcome = validate(&input, &EngineConfig::default(), today()).expect("outcome");

    assert_eq!(outcome.barcode_dialect, Some(Dialect::AnsiLines));
    assert_eq!(outcome.report.match_count(), FIELD_PAIRINGS.len());
    assert!(outcome.report.overall_score_percent >= 85);
    assert!(outcome.report.confidence_level >= ConfidenceLevel::High);
    assert_eq!(outcome.advice.severity, Severity::Clear);
    assert!(!outcome.needs_manual_review());
    assert_eq!(outcome.front_validity.expired, Some(true));
    assert_eq!(outcome.barcode_validity.age_years, Some(50));
}

#[test]
fn mismatched_birth_date_forces_manual_review() {
    let front = CA_FRONT.replace("DOB 01/13/1976", "DOB 07/04/1982");
    let input = RawDocumentInput::both(front, CA_BARCODE);
    let outcome = validate(&input, &EngineConfig::default(), today()).expect("outcome");
    let dob = result_for(&outcome.report, &Field::DateOfBirth);
    assert!(dob.classification.is_mismatch());
    assert_eq!(outcome.advice.severity, Severity::ManualReview);
}

#[test]
fn ansi_marker_beats_leading_caret() {
    assert_eq!(detect_dialect("^DAQC5494170\nANSI 636014"), Dialect::AnsiLines);
    assert_eq!(detect_dialect("^DAQC5494170$DCSSMITH"), Dialect::CaretDelimited);
    assert_eq!(detect_dialect("SMITH JOHN 01131976"), Dialect::Unstructured);
}

#[test]
fn outcome_serializes_with_field_labels() {
    let input = RawDocumentInput::both(CA_FRONT, CA_BARCODE);
    let outcome = validate(&input, &EngineConfig::default(), today()).expect("outcome");
    let json = serde_json::to_value(&outcome).expect("serializable");
    assert_eq!(json["front_fields"]["Date of Birth"], "01/13/1976");
    assert_eq!(json["barcode_fields"]["License Number"], "C5494170");
}

#[test]
fn repeated_validation_is_deterministic() {
    let input = RawDocumentInput::both(CA_FRONT, CA_BARCODE);
    let config = EngineConfig::default();
    let first = validate(&input, &config, today()).expect("outcome");
    let second = validate(&input, &config, today()).expect("outcome");
    assert_eq!(first.front_fields, second.front_fields);
    assert_eq!(first.barcode_fields, second.barcode_fields);
    assert_eq!(first.report, second.report);
}

// -- Properties ---------------------------------------------------------------

proptest! {
    #[test]
    fn caret_payload_round_trips(
        license in "[A-Z][0-9]{6}",
        last in "[A-Z]{2,12}",
        first in "[A-Z]{2,12}",
        month in 1u32..=12,
        day in 1u32..=28,
        year in 1920u32..=2010,
        state in prop::sample::select(vec!["CA", "NY", "TX", "WA"]),
    ) {
        let payload = format!(
            "^DAQ{license}$DCS{last}$DAC{first}$DBB{month:02}{day:02}{year}$DAJ{state}"
        );
        let fields = barcode::decode(&payload);
        prop_assert_eq!(fields.get(&Field::LicenseNumber), Some(license.as_str()));
        let last = to_proper_case(&last);
        let first = to_proper_case(&first);
        prop_assert_eq!(fields.get(&Field::LastName), Some(last.as_str()));
        prop_assert_eq!(fields.get(&Field::FirstName), Some(first.as_str()));
        let dob = format!("{month:02}/{day:02}/{year}");
        prop_assert_eq!(fields.get(&Field::DateOfBirth), Some(dob.as_str()));
        prop_assert_eq!(fields.get(&Field::State), Some(state));
    }

    #[test]
    fn score_stays_within_bounds(front in "\\PC{0,200}", barcode in "\\PC{0,200}") {
        let input = RawDocumentInput::both(front, barcode);
        if let Ok(outcome) = validate(&input, &EngineConfig::default(), today()) {
            prop_assert!(outcome.report.overall_score_percent <= 100);
            prop_assert_eq!(
                outcome.report.confidence_level,
                ConfidenceLevel::from_percent(outcome.report.overall_score_percent)
            );
        }
    }

    #[test]
    fn decoding_is_deterministic(payload in "\\PC{0,200}") {
        prop_assert_eq!(barcode::decode(&payload), barcode::decode(&payload));
        prop_assert_eq!(ocr::extract(&payload), ocr::extract(&payload));
    }
}
