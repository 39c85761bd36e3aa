// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AAMVA data element table.
//
// This table is the single source of truth for element code semantics. Every
// dialect and the embedded-code scan resolve codes through it.

use ausweis_core::config::ExtractionConfig;
use ausweis_core::Field;

use crate::normalize::{
    format_date, format_height, format_weight, format_zip, to_proper_case,
};

/// How a raw element value becomes a canonical display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    ProperCase,
    /// `LAST,FIRST,MIDDLE` re-ordered to `First Middle Last`.
    FullName,
    Upper,
    Date,
    Sex,
    Height,
    Weight,
    Zip,
    /// `1`/`Y` is `Yes`, anything else `No`.
    Flag,
    /// REAL ID compliance type: `F` (fully compliant) is `Yes`.
    Compliance,
    /// Restriction or endorsement codes; `NONE` means no data.
    Listing,
}

impl ValueTransform {
    /// Apply the transform. Blank input and listings of `NONE` yield nothing.
    pub fn apply(&self, raw: &str, config: &ExtractionConfig) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        let rendered = match self {
            Self::ProperCase => to_proper_case(value),
            Self::FullName => full_name(value),
            Self::Upper => value.to_ascii_uppercase(),
            Self::Date => format_date(value),
            Self::Sex => config.sex_policy.label_for(value).to_string(),
            Self::Height => format_height(value),
            Self::Weight => format_weight(value),
            Self::Zip => format_zip(value),
            Self::Flag => yes_no(matches!(
                value.to_ascii_uppercase().as_str(),
                "1" | "Y" | "YES"
            )),
            Self::Compliance => yes_no(value.eq_ignore_ascii_case("F")),
            Self::Listing => {
                let upper = value.to_ascii_uppercase();
                if upper == "NONE" {
                    return None;
                }
                upper
            }
        };
        Some(rendered)
    }
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn full_name(value: &str) -> String {
    if !value.contains(',') {
        return to_proper_case(value);
    }
    let mut parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() > 1 {
        let last = parts.remove(0);
        parts.push(last);
    }
    to_proper_case(&parts.join(" "))
}

/// One row of the element table.
#[derive(Debug)]
pub struct ElementRule {
    pub code: &'static str,
    pub field: Field,
    pub transform: ValueTransform,
}

const fn rule(code: &'static str, field: Field, transform: ValueTransform) -> ElementRule {
    ElementRule {
        code,
        field,
        transform,
    }
}

/// Element codes across AAMVA versions 1-10. Several codes alias one field
/// (older versions used `DAB`/`DAR`/`DAS`/`DAT`; residence address elements
/// `DAL`/`DAN`/`DAO`/`DAP` alias the mailing ones).
pub static ELEMENT_RULES: [ElementRule; 32] = [
    rule("DAA", Field::Name, ValueTransform::FullName),
    rule("DAB", Field::LastName, ValueTransform::ProperCase),
    rule("DAC", Field::FirstName, ValueTransform::ProperCase),
    rule("DAD", Field::MiddleName, ValueTransform::ProperCase),
    rule("DCS", Field::LastName, ValueTransform::ProperCase),
    rule("DCT", Field::FirstName, ValueTransform::ProperCase),
    rule("DBB", Field::DateOfBirth, ValueTransform::Date),
    rule("DBA", Field::ExpirationDate, ValueTransform::Date),
    rule("DBD", Field::IssueDate, ValueTransform::Date),
    rule("DBC", Field::Sex, ValueTransform::Sex),
    rule("DAU", Field::Height, ValueTransform::Height),
    rule("DAW", Field::Weight, ValueTransform::Weight),
    rule("DAY", Field::EyeColor, ValueTransform::ProperCase),
    rule("DAZ", Field::HairColor, ValueTransform::ProperCase),
    rule("DAG", Field::Address, ValueTransform::ProperCase),
    rule("DAL", Field::Address, ValueTransform::ProperCase),
    rule("DAI", Field::City, ValueTransform::ProperCase),
    rule("DAN", Field::City, ValueTransform::ProperCase),
    rule("DAJ", Field::State, ValueTransform::Upper),
    rule("DAO", Field::State, ValueTransform::Upper),
    rule("DAK", Field::ZipCode, ValueTransform::Zip),
    rule("DAP", Field::ZipCode, ValueTransform::Zip),
    rule("DAQ", Field::LicenseNumber, ValueTransform::Upper),
    rule("DCA", Field::Class, ValueTransform::Upper),
    rule("DAR", Field::Class, ValueTransform::Upper),
    rule("DCB", Field::Restrictions, ValueTransform::Listing),
    rule("DAS", Field::Restrictions, ValueTransform::Listing),
    rule("DCD", Field::Endorsements, ValueTransform::Listing),
    rule("DAT", Field::Endorsements, ValueTransform::Listing),
    rule("DDL", Field::Veteran, ValueTransform::Flag),
    rule("DDK", Field::OrganDonor, ValueTransform::Flag),
    rule("DDA", Field::RealId, ValueTransform::Compliance),
];

/// Look up the rule for an element code.
pub fn rule_for(code: &str) -> Option<&'static ElementRule> {
    ELEMENT_RULES.iter().find(|rule| rule.code == code)
}

/// Whether `code` is shaped like an AAMVA element id (three capitals).
pub fn is_element_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Values that carry no information for the catch-all.
fn is_trivial(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "" | "NONE" | "UNK" | "N"
    )
}

/// Decode a code/value pair through the table only.
pub fn decode_known_element(
    code: &str,
    value: &str,
    config: &ExtractionConfig,
) -> Option<(Field, String)> {
    let rule = rule_for(code)?;
    let rendered = rule.transform.apply(value, config)?;
    Some((rule.field.clone(), rendered))
}

/// Decode a code/value pair, admitting unrecognised element codes under a
/// title-cased rendering of the code itself.
pub fn decode_element(
    code: &str,
    value: &str,
    config: &ExtractionConfig,
) -> Option<(Field, String)> {
    if rule_for(code).is_some() {
        return decode_known_element(code, value, config);
    }
    if is_element_code(code) && !is_trivial(value) {
        return Some((Field::Other(to_proper_case(code)), value.trim().to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(code: &str, value: &str) -> Option<(Field, String)> {
        decode_element(code, value, &ExtractionConfig::default())
    }

    #[test]
    fn every_code_is_unique() {
        for (i, a) in ELEMENT_RULES.iter().enumerate() {
            for b in &ELEMENT_RULES[i + 1..] {
                assert_ne!(a.code, b.code, "duplicate rule for {}", a.code);
            }
        }
    }

    #[test]
    fn aliases_share_a_field() {
        assert_eq!(decode("DAJ", "CA"), Some((Field::State, "CA".into())));
        assert_eq!(decode("DAO", "ca"), Some((Field::State, "CA".into())));
        assert_eq!(decode("DAB", "SMITH"), decode("DCS", "SMITH"));
    }

    #[test]
    fn transforms_run_per_code() {
        assert_eq!(
            decode("DBB", "01131976"),
            Some((Field::DateOfBirth, "01/13/1976".into()))
        );
        assert_eq!(
            decode("DAU", "069 IN"),
            Some((Field::Height, "5'9\" (69\")".into()))
        );
        assert_eq!(decode("DBC", "1"), Some((Field::Sex, "Male".into())));
        assert_eq!(decode("DAW", "185"), Some((Field::Weight, "185 lbs".into())));
        assert_eq!(decode("DDL", "1"), Some((Field::Veteran, "Yes".into())));
        assert_eq!(decode("DDA", "F"), Some((Field::RealId, "Yes".into())));
        assert_eq!(decode("DDA", "N"), Some((Field::RealId, "No".into())));
    }

    #[test]
    fn full_name_is_reordered() {
        assert_eq!(
            decode("DAA", "SMITH,JOHN,ALLEN"),
            Some((Field::Name, "John Allen Smith".into()))
        );
        assert_eq!(
            decode("DAA", "JOHN SMITH"),
            Some((Field::Name, "John Smith".into()))
        );
    }

    #[test]
    fn none_listings_are_suppressed() {
        assert_eq!(decode("DCB", "NONE"), None);
        assert_eq!(decode("DCB", "B"), Some((Field::Restrictions, "B".into())));
    }

    #[test]
    fn unknown_codes_fall_through_to_catch_all() {
        assert_eq!(
            decode("DCF", "83D9BN217QO983B1"),
            Some((Field::Other("Dcf".into()), "83D9BN217QO983B1".into()))
        );
    }

    #[test]
    fn catch_all_skips_trivial_values_and_odd_codes() {
        assert_eq!(decode("DCF", "NONE"), None);
        assert_eq!(decode("DCF", "UNK"), None);
        assert_eq!(decode("DDB", "N"), None);
        assert_eq!(decode("DCF", ""), None);
        assert_eq!(decode("D1F", "VALUE"), None);
        assert_eq!(decode("ans", "VALUE"), None);
    }

    #[test]
    fn known_element_only_decoder_ignores_unknown_codes() {
        let config = ExtractionConfig::default();
        assert_eq!(decode_known_element("DCF", "ABC", &config), None);
        assert_eq!(
            decode_known_element("DAC", "JOHN", &config),
            Some((Field::FirstName, "John".into()))
        );
    }
}
