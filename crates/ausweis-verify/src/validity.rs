// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date-based checks on one side's fields: expiry, holder age, and whether the
// printed dates are consistent with each other.

use ausweis_core::{Field, FieldMap};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Canonical date rendering produced by the normalizer.
const CARD_DATE_FORMAT: &str = "%m/%d/%Y";

/// Something about the dates on a card that does not add up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidityWarning {
    /// A date field is present but not `MM/DD/YYYY`.
    UnparsableDate { field: Field },
    BornAfterIssue,
    IssuedAfterExpiry,
    BornInFuture,
}

/// Result of [`assess`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentValidity {
    /// `None` when there is no readable expiration date.
    pub expired: Option<bool>,
    /// Whole years since the date of birth.
    pub age_years: Option<u32>,
    pub warnings: Vec<ValidityWarning>,
}

impl DocumentValidity {
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Parse a card date (`MM/DD/YYYY`).
pub fn parse_card_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), CARD_DATE_FORMAT).ok()
}

/// Whole years between `born` and `on`; `None` if `on` precedes `born`.
pub fn age_on(born: NaiveDate, on: NaiveDate) -> Option<u32> {
    if on < born {
        return None;
    }
    let had_birthday = (on.month(), on.day()) >= (born.month(), born.day());
    let years = on.year() - born.year() - i32::from(!had_birthday);
    u32::try_from(years).ok()
}

/// Assess the dates in `fields` as of `today`.
pub fn assess(fields: &FieldMap, today: NaiveDate) -> DocumentValidity {
    let mut warnings = Vec::new();
    let mut date = |field: Field| -> Option<NaiveDate> {
        let raw = fields.get(&field)?;
        let parsed = parse_card_date(raw);
        if parsed.is_none() {
            warnings.push(ValidityWarning::UnparsableDate { field });
        }
        parsed
    };

    let born = date(Field::DateOfBirth);
    let issued = date(Field::IssueDate);
    let expires = date(Field::ExpirationDate);

    if let (Some(born), Some(issued)) = (born, issued) {
        if born > issued {
            warnings.push(ValidityWarning::BornAfterIssue);
        }
    }
    if let (Some(issued), Some(expires)) = (issued, expires) {
        if issued > expires {
            warnings.push(ValidityWarning::IssuedAfterExpiry);
        }
    }
    if born.is_some_and(|born| born > today) {
        warnings.push(ValidityWarning::BornInFuture);
    }

    DocumentValidity {
        expired: expires.map(|expires| expires < today),
        age_years: born.and_then(|born| age_on(born, today)),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn card() -> FieldMap {
        FieldMap::new()
            .with(Field::DateOfBirth, "01/13/1976")
            .with(Field::IssueDate, "08/31/2009")
            .with(Field::ExpirationDate, "01/13/2015")
    }

    #[test]
    fn expired_card_is_flagged() {
        let validity = assess(&card(), day(2026, 10, 18));
        assert_eq!(validity.expired, Some(true));
        assert_eq!(validity.age_years, Some(50));
        assert!(validity.is_consistent());
    }

    #[test]
    fn card_is_valid_through_its_expiry_day() {
        let validity = assess(&card(), day(2015, 1, 13));
        assert_eq!(validity.expired, Some(false));
        assert_eq!(validity.age_years, Some(39));
    }

    #[test]
    fn age_counts_only_completed_years() {
        assert_eq!(age_on(day(1976, 1, 13), day(2026, 1, 12)), Some(49));
        assert_eq!(age_on(day(1976, 1, 13), day(2026, 1, 13)), Some(50));
        assert_eq!(age_on(day(2000, 2, 29), day(2001, 2, 28)), Some(0));
        assert_eq!(age_on(day(2000, 1, 1), day(1999, 1, 1)), None);
    }

    #[test]
    fn inconsistent_dates_are_warned_about() {
        let fields = FieldMap::new()
            .with(Field::DateOfBirth, "01/13/2010")
            .with(Field::IssueDate, "08/31/2009")
            .with(Field::ExpirationDate, "01/13/2008");
        let validity = assess(&fields, day(2026, 10, 18));
        assert_eq!(
            validity.warnings,
            vec![
                ValidityWarning::BornAfterIssue,
                ValidityWarning::IssuedAfterExpiry,
            ]
        );
    }

    #[test]
    fn unparsable_and_absent_dates() {
        let fields = FieldMap::new().with(Field::DateOfBirth, "1976-01-13");
        let validity = assess(&fields, day(2026, 10, 18));
        assert_eq!(validity.expired, None);
        assert_eq!(validity.age_years, None);
        assert_eq!(
            validity.warnings,
            vec![ValidityWarning::UnparsableDate {
                field: Field::DateOfBirth
            }]
        );
        assert_eq!(assess(&FieldMap::new(), day(2026, 10, 18)), DocumentValidity::default());
    }

    #[test]
    fn future_birth_date_is_warned_about() {
        let fields = FieldMap::new().with(Field::DateOfBirth, "01/01/2030");
        let validity = assess(&fields, day(2026, 10, 18));
        assert_eq!(validity.warnings, vec![ValidityWarning::BornInFuture]);
        assert_eq!(validity.age_years, None);
    }
}
