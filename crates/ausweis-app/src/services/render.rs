// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text summaries for terminal output.

use std::fmt::Write;

use ausweis_core::{FieldMap, MatchClassification};
use ausweis_verify::{DocumentValidity, ValidationOutcome, ValidityWarning};

const LABEL_WIDTH: usize = 22;

/// One `label value` line per field, in field order.
pub fn fields_table(fields: &FieldMap) -> String {
    if fields.is_empty() {
        return "  (no fields found)\n".to_string();
    }
    fields.iter().fold(String::new(), |mut out, (field, value)| {
        let _ = writeln!(out, "  {:<LABEL_WIDTH$} {value}", field.label());
        out
    })
}

fn classification_label(classification: &MatchClassification) -> Option<String> {
    let label = match classification {
        MatchClassification::Match => "match".to_string(),
        MatchClassification::PartialMatch { similarity } => {
            format!("partial ({:.0}%)", similarity * 100.0)
        }
        MatchClassification::Mismatch { similarity } => {
            format!("MISMATCH ({:.0}%)", similarity * 100.0)
        }
        MatchClassification::FrontOnly => "front only".to_string(),
        MatchClassification::BarcodeOnly => "barcode only".to_string(),
        MatchClassification::Missing => return None,
    };
    Some(label)
}

fn validity_line(side: &str, validity: &DocumentValidity) -> String {
    let expiry = match validity.expired {
        Some(true) => "expired",
        Some(false) => "in date",
        None => "no expiry date",
    };
    let age = validity
        .age_years
        .map_or_else(|| "age unknown".to_string(), |age| format!("holder aged {age}"));
    let warnings: Vec<String> = validity.warnings.iter().map(warning_text).collect();
    if warnings.is_empty() {
        format!("  {side:<8} {expiry}, {age}\n")
    } else {
        format!("  {side:<8} {expiry}, {age}; {}\n", warnings.join("; "))
    }
}

fn warning_text(warning: &ValidityWarning) -> String {
    match warning {
        ValidityWarning::UnparsableDate { field } => format!("unreadable {}", field.label()),
        ValidityWarning::BornAfterIssue => "born after issue date".to_string(),
        ValidityWarning::IssuedAfterExpiry => "issued after expiry".to_string(),
        ValidityWarning::BornInFuture => "birth date in the future".to_string(),
    }
}

/// Human summary of a validation attempt.
pub fn outcome_summary(outcome: &ValidationOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Score {}% ({} confidence), {} of {} points",
        report.overall_score_percent,
        report.confidence_level,
        report.points_awarded.round(),
        report.max_possible_score
    );
    let _ = writeln!(out, "{}", outcome.advice.message);
    let _ = writeln!(out, "{}\n", outcome.advice.suggestion);

    out.push_str("Fields:\n");
    for result in &report.field_results {
        let Some(label) = classification_label(&result.classification) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  {:<LABEL_WIDTH$} {label:<16} {} / {}",
            result.front_key.label(),
            result.front_value.as_deref().unwrap_or("-"),
            result.barcode_value.as_deref().unwrap_or("-"),
        );
    }
    let _ = writeln!(out, "  Shared words: {}\n", report.word_overlap_count);

    out.push_str("Dates:\n");
    out.push_str(&validity_line("front", &outcome.front_validity));
    out.push_str(&validity_line("barcode", &outcome.barcode_validity));

    if !outcome.ambiguities.is_empty() {
        let _ = writeln!(
            out,
            "\n{} OCR reading(s) were ambiguous; the first match was kept.",
            outcome.ambiguities.len()
        );
    }
    out
}
