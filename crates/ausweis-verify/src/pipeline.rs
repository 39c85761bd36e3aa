// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation pipeline: both captures of one card in, a complete outcome out.
//
// The barcode and the front text are read independently, then compared. The
// attempt id lives on the outcome only, so the match report for a given pair
// of captures is always identical.

use ausweis_core::review::{ReviewAdvice, advise};
use ausweis_core::{AusweisError, EngineConfig, FieldMap, MatchReport, RawDocumentInput};
use ausweis_extract::{Ambiguity, BarcodeDecoder, Dialect, OcrExtractor};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::matcher::Matcher;
use crate::validity::{DocumentValidity, assess};

/// Everything learned from one validation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub attempt_id: Uuid,
    pub front_fields: FieldMap,
    pub barcode_fields: FieldMap,
    pub report: MatchReport,
    /// `None` when no barcode payload was supplied.
    pub barcode_dialect: Option<Dialect>,
    /// OCR rules that disagreed with an earlier, winning rule.
    pub ambiguities: Vec<Ambiguity>,
    pub front_validity: DocumentValidity,
    pub barcode_validity: DocumentValidity,
    pub advice: ReviewAdvice,
}

impl ValidationOutcome {
    pub fn needs_manual_review(&self) -> bool {
        self.advice.needs_manual_review
    }
}

/// Configured extractor, decoder and matcher.
#[derive(Debug, Clone)]
pub struct Validator {
    extractor: OcrExtractor,
    decoder: BarcodeDecoder,
    matcher: Matcher,
}

impl Validator {
    /// Build a validator, rejecting an invalid configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, AusweisError> {
        config.validate()?;
        Ok(Self {
            extractor: OcrExtractor::new(config.extraction),
            decoder: BarcodeDecoder::new(config.extraction),
            matcher: Matcher::new(config.matching.clone()),
        })
    }

    /// Validate one card. Fails only when neither capture was supplied.
    #[instrument(skip_all)]
    pub fn validate(
        &self,
        input: &RawDocumentInput,
        today: NaiveDate,
    ) -> Result<ValidationOutcome, AusweisError> {
        if input.is_empty() {
            return Err(AusweisError::MissingInput);
        }
        let attempt_id = Uuid::new_v4();

        let extraction = self.extractor.extract_detailed(input.ocr_text());
        for ambiguity in &extraction.ambiguities {
            warn!(
                %attempt_id,
                field = %ambiguity.field,
                kept = ambiguity.kept_rule,
                rejected = ambiguity.rejected_rule,
                "OCR rules disagree; kept the higher-priority reading"
            );
        }

        let (barcode_fields, barcode_dialect) = if input.barcode_payload().trim().is_empty() {
            (FieldMap::new(), None)
        } else {
            let decoded = self.decoder.decode_detailed(input.barcode_payload());
            (decoded.fields, Some(decoded.dialect))
        };
        let front_fields = extraction.fields;

        let report = self.matcher.compare(
            &front_fields,
            &barcode_fields,
            input.ocr_text(),
            input.barcode_payload(),
        );
        let advice = advise(&report, &front_fields, &barcode_fields);

        if report.confidence_level.needs_review() {
            warn!(
                %attempt_id,
                score = report.overall_score_percent,
                confidence = %report.confidence_level,
                "Low confidence match"
            );
        }
        info!(
            %attempt_id,
            score = report.overall_score_percent,
            front_fields = front_fields.len(),
            barcode_fields = barcode_fields.len(),
            manual_review = advice.needs_manual_review,
            "Validation complete"
        );

        Ok(ValidationOutcome {
            attempt_id,
            front_validity: assess(&front_fields, today),
            barcode_validity: assess(&barcode_fields, today),
            front_fields,
            barcode_fields,
            report,
            barcode_dialect,
            ambiguities: extraction.ambiguities,
            advice,
        })
    }
}

/// Validate one card with `config`.
pub fn validate(
    input: &RawDocumentInput,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<ValidationOutcome, AusweisError> {
    Validator::new(config)?.validate(input, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausweis_core::review::Severity;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    #[test]
    fn empty_input_is_an_error() {
        let result = validate(&RawDocumentInput::default(), &EngineConfig::default(), today());
        assert!(matches!(result, Err(AusweisError::MissingInput)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.matching.partial_threshold = 1.5;
        assert!(matches!(
            Validator::new(&config),
            Err(AusweisError::Config(_))
        ));
    }

    #[test]
    fn front_only_capture_asks_for_a_rescan() {
        let input = RawDocumentInput::new(Some("DOB 01/13/1976".into()), None);
        let outcome = validate(&input, &EngineConfig::default(), today()).expect("outcome");
        assert_eq!(outcome.barcode_dialect, None);
        assert!(outcome.barcode_fields.is_empty());
        assert_eq!(outcome.advice.severity, Severity::Retake);
        assert!(outcome.needs_manual_review());
    }

    #[test]
    fn attempt_ids_differ_but_reports_do_not() {
        let input = RawDocumentInput::both("DOB 02/03/1990", "^DAQD1234567$DCSGARCIA$DBB02031990");
        let config = EngineConfig::default();
        let first = validate(&input, &config, today()).expect("outcome");
        let second = validate(&input, &config, today()).expect("outcome");
        assert_ne!(first.attempt_id, second.attempt_id);
        assert_eq!(first.report, second.report);
        assert_eq!(first.barcode_dialect, Some(Dialect::CaretDelimited));
    }
}
