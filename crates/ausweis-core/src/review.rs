// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable guidance for the people operating the check at a counter.
//
// The engine never fails a document outright. A low score or widespread
// mismatches become "needs manual review"; a missing side becomes "scan it
// again". The taxonomy uses four severity levels that drive UI presentation.

use serde::Serialize;

use crate::error::AusweisError;
use crate::types::{ConfidenceLevel, FieldMap, MatchReport};

/// Severity of an outcome from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Front and back agree; nothing to do.
    Clear,
    /// Mostly consistent, worth a second look.
    ReviewSuggested,
    /// A person has to compare the card by hand.
    ManualReview,
    /// A capture is unusable; scan again.
    Retake,
}

/// Plain-language summary of a validation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewAdvice {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the operator should do next (shown as body text).
    pub suggestion: String,
    /// Whether the result must not be accepted without a person looking.
    pub needs_manual_review: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Weight at or above which a disagreement alone forces manual review.
const CRITICAL_WEIGHT: u32 = 20;

/// Mismatch count at which the card is treated as inconsistent.
const MISMATCH_LIMIT: usize = 3;

/// Turn a match report into operator guidance.
pub fn advise(report: &MatchReport, front: &FieldMap, barcode: &FieldMap) -> ReviewAdvice {
    match (front.is_empty(), barcode.is_empty()) {
        (true, true) => {
            return advice(
                "We couldn't read either side of the card.",
                "Scan the front and the back again in good light, holding the card flat.",
                Severity::Retake,
            );
        }
        (false, true) => {
            return advice(
                "The barcode on the back couldn't be read.",
                "Scan the back again, keeping the whole barcode inside the frame.",
                Severity::Retake,
            );
        }
        (true, false) => {
            return advice(
                "The text on the front couldn't be read.",
                "Scan the front again, avoiding glare on the photo and text.",
                Severity::Retake,
            );
        }
        (false, false) => {}
    }

    if let Some(critical) = report
        .mismatches()
        .find(|result| result.weight >= CRITICAL_WEIGHT)
    {
        return advice(
            format!(
                "The {} on the front doesn't match the barcode.",
                critical.front_key.label().to_lowercase()
            ),
            "Compare the card with the holder by hand before accepting it.",
            Severity::ManualReview,
        );
    }

    let mismatches = report.mismatches().count();
    if mismatches >= MISMATCH_LIMIT {
        return advice(
            format!("{mismatches} details on the front don't match the barcode."),
            "Compare the card with the holder by hand before accepting it.",
            Severity::ManualReview,
        );
    }

    match report.confidence_level {
        ConfidenceLevel::VeryHigh | ConfidenceLevel::High => advice(
            "The front and back of the card agree.",
            "No further checks needed.",
            Severity::Clear,
        ),
        ConfidenceLevel::Medium => advice(
            "The front and back mostly agree.",
            "Glance over the highlighted details before continuing.",
            Severity::ReviewSuggested,
        ),
        ConfidenceLevel::Low | ConfidenceLevel::VeryLow => advice(
            format!(
                "Only {}% of the card could be confirmed.",
                report.overall_score_percent
            ),
            "Check the card by hand, or scan both sides again.",
            Severity::ManualReview,
        ),
    }
}

fn advice(
    message: impl Into<String>,
    suggestion: impl Into<String>,
    severity: Severity,
) -> ReviewAdvice {
    ReviewAdvice {
        message: message.into(),
        suggestion: suggestion.into(),
        needs_manual_review: matches!(severity, Severity::ManualReview | Severity::Retake),
        severity,
    }
}

/// Convert an `AusweisError` into something an operator can act on.
pub fn humanize_error(err: &AusweisError) -> HumanError {
    match err {
        AusweisError::MissingInput => HumanError {
            message: "Nothing was scanned.".into(),
            suggestion: "Provide the front text, the barcode contents, or both.".into(),
            severity: Severity::Retake,
        },

        AusweisError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or remove the settings file and try again. ({detail})"),
            severity: Severity::ManualReview,
        },

        AusweisError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The scan file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again."
                        .into(),
                    severity: Severity::Retake,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere readable."
                        .into(),
                    severity: Severity::Retake,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    severity: Severity::Retake,
                }
            }
        }

        AusweisError::Serialization(_) => HumanError {
            message: "A saved file isn't in the expected format.".into(),
            suggestion: "Check that the settings file is valid JSON.".into(),
            severity: Severity::ManualReview,
        },
    }
}
