// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode record decoder: payload string in, `FieldMap` out.
//
// Three payload dialects are sniffed in order (ANSI line records, `^`/`$`
// delimited records, unstructured text). An embedded element-code scan then
// fills any gaps the primary dialect left. Decoding never fails; a payload
// with nothing recognisable yields an empty map.

use ausweis_core::config::ExtractionConfig;
use ausweis_core::{Field, FieldMap};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::codes::{decode_element, decode_known_element, rule_for};
use super::header::AamvaHeader;
use crate::normalize::{format_date, to_proper_case};

/// Trailing license number on the header line, after `DAQ` or a space.
static HEADER_LICENSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:DAQ|\s)([A-Z]\d{4,})\s*$").expect("static regex"));

static LOOSE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{2,})\s+([A-Z]{2,})\b").expect("static regex"));

static LOOSE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2}/\d{2}/\d{4}|\d{8})\b").expect("static regex"));

static LOOSE_LICENSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z0-9]{6,})\b").expect("static regex"));

/// Payload layout, detected from content markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    /// Contains `ANSI`; one element per line.
    AnsiLines,
    /// Starts with `^`; elements separated by `$`.
    CaretDelimited,
    /// Neither marker; pattern extraction only.
    Unstructured,
}

/// Detect the dialect. `ANSI` wins over a leading `^`.
pub fn detect_dialect(payload: &str) -> Dialect {
    if payload.contains("ANSI") {
        Dialect::AnsiLines
    } else if payload.trim_start().starts_with('^') {
        Dialect::CaretDelimited
    } else {
        Dialect::Unstructured
    }
}

/// Everything the decoder learned from one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedBarcode {
    pub dialect: Dialect,
    pub header: Option<AamvaHeader>,
    pub fields: FieldMap,
}

/// Decodes AAMVA driver's license barcode payloads.
#[derive(Debug, Clone, Default)]
pub struct BarcodeDecoder {
    config: ExtractionConfig,
}

impl BarcodeDecoder {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Decode a payload into canonical fields.
    pub fn decode(&self, payload: &str) -> FieldMap {
        self.decode_detailed(payload).fields
    }

    /// Decode a payload, keeping the detected dialect and header.
    #[instrument(skip_all, fields(payload_len = payload.len()))]
    pub fn decode_detailed(&self, payload: &str) -> DecodedBarcode {
        let dialect = detect_dialect(payload);
        debug!(?dialect, "Barcode dialect detected");

        let (primary, header) = match dialect {
            Dialect::AnsiLines => (self.decode_ansi_lines(payload), AamvaHeader::parse(payload)),
            Dialect::CaretDelimited => (self.decode_caret_delimited(payload), None),
            Dialect::Unstructured => (decode_unstructured(payload), None),
        };
        let primary_count = primary.len();

        // Primary results must be complete before the scan: it only fills gaps.
        let fields = primary.merge_missing(self.scan_embedded(payload, dialect));
        let recovered = fields.len() - primary_count;

        let fields = match header.as_ref().and_then(AamvaHeader::jurisdiction) {
            Some(state) => fields.with_missing(Field::State, state),
            None => fields,
        };
        let fields = fields.with_consolidated_name();

        info!(
            ?dialect,
            field_count = fields.len(),
            recovered,
            "Barcode decoded"
        );
        DecodedBarcode {
            dialect,
            header,
            fields,
        }
    }

    fn decode_ansi_lines(&self, payload: &str) -> FieldMap {
        let lines: Vec<&str> = payload.split(['\n', '\r']).map(clean_segment).collect();

        // The structured header is authoritative over a possibly-truncated
        // DAQ line, so it is applied after the per-line pass.
        let header_license = lines
            .iter()
            .find(|line| line.contains("ANSI") && line.contains("DL"))
            .and_then(|line| HEADER_LICENSE.captures(line))
            .map(|caps| caps[1].to_string());

        let fields = lines
            .iter()
            .filter(|line| !line.contains("ANSI"))
            .filter_map(|line| element_parts(line))
            .fold(FieldMap::new(), |map, (code, value)| {
                match decode_element(code, value, &self.config) {
                    Some((field, value)) => map.with(field, value),
                    None => map,
                }
            });

        match header_license {
            Some(number) => {
                debug!("License number taken from header line");
                fields.with(Field::LicenseNumber, number)
            }
            None => fields,
        }
    }

    fn decode_caret_delimited(&self, payload: &str) -> FieldMap {
        payload
            .split('$')
            .map(|segment| clean_segment(segment.trim_start_matches('^')))
            .filter_map(element_parts)
            .fold(FieldMap::new(), |map, (code, value)| {
                match decode_element(code, value, &self.config) {
                    Some((Field::LicenseNumber, number)) => {
                        map.with(Field::LicenseNumber, last_seven(&number))
                    }
                    Some((field, value)) => map.with(field, value),
                    None => map,
                }
            })
    }

    /// Recover known elements from tokens that no dialect split cleanly.
    ///
    /// The payload is split on every delimiter at once, so each token holds
    /// at most one element even when records are glued together.
    fn scan_embedded(&self, payload: &str, dialect: Dialect) -> FieldMap {
        let delimiters = self.config.embedded_scan.delimiters();
        if delimiters.is_empty() {
            return FieldMap::new();
        }
        payload
            .split(delimiters)
            .map(clean_segment)
            .filter(|token| token.chars().count() >= 6)
            .filter_map(element_parts)
            .filter_map(|(code, value)| decode_known_element(code, value, &self.config))
            .fold(FieldMap::new(), |map, (field, value)| {
                if field == Field::LicenseNumber && dialect != Dialect::AnsiLines {
                    map.with_missing(field, last_seven(&value))
                } else {
                    map.with_missing(field, value)
                }
            })
    }
}

/// Decode a payload with the default configuration.
pub fn decode(payload: &str) -> FieldMap {
    BarcodeDecoder::default().decode(payload)
}

/// Pattern extraction for payloads without any structure marker.
fn decode_unstructured(payload: &str) -> FieldMap {
    let name = LOOSE_NAME
        .captures_iter(payload)
        .find(|caps| !starts_with_element_code(&caps[1]) && !starts_with_element_code(&caps[2]))
        .map(|caps| to_proper_case(&format!("{} {}", &caps[1], &caps[2])));

    let date = LOOSE_DATE
        .captures(payload)
        .map(|caps| caps[1].to_string());

    let license = LOOSE_LICENSE
        .captures_iter(payload)
        .map(|caps| caps[1].to_string())
        .find(|token| {
            token.bytes().any(|b| b.is_ascii_digit())
                && Some(token) != date.as_ref()
                && !starts_with_element_code(token)
        });

    let fields = FieldMap::new();
    let fields = match name {
        Some(name) => fields.with(Field::Name, name),
        None => fields,
    };
    let fields = match &date {
        Some(date) => fields.with(Field::DateOfBirth, format_date(date)),
        None => fields,
    };
    match license {
        Some(number) => fields.with(Field::LicenseNumber, last_seven(&number)),
        None => fields,
    }
}

/// Strip whitespace, control separators and the `@` compliance indicator.
fn clean_segment(segment: &str) -> &str {
    segment.trim_matches(|c: char| c.is_whitespace() || c.is_control() || c == '@')
}

/// Split a record into its three-character code and trimmed value.
///
/// A leading `DL`/`ID` subfile designator is dropped when a known element
/// code follows it directly (`DLDAQC5494170`).
fn element_parts(record: &str) -> Option<(&str, &str)> {
    let record = match (record.get(..2), record.get(2..5)) {
        (Some("DL" | "ID"), Some(code)) if rule_for(code).is_some() => &record[2..],
        _ => record,
    };
    let code = record.get(..3)?;
    let value = record.get(3..)?;
    Some((code, value.trim()))
}

fn starts_with_element_code(token: &str) -> bool {
    token.len() > 3 && token.get(..3).is_some_and(|code| rule_for(code).is_some())
}

/// AAMVA subfile license numbers carry a non-discriminating prefix; keep the
/// last seven characters.
fn last_seven(number: &str) -> String {
    let count = number.chars().count();
    if count >= 7 {
        number.chars().skip(count - 7).collect()
    } else {
        number.to_string()
    }
}
