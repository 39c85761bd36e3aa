// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field normalizer. Converts raw tokens from either source into the canonical
// display strings stored in a `FieldMap`.
//
// Every transform is total and idempotent on its own output: input it does not
// recognise is returned unchanged rather than guessed at.

use ausweis_core::config::SexPolicy;
use once_cell::sync::Lazy;
use regex::Regex;

static FORMATTED_HEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:\d+'(?:\d+")? \(\d+"\)|\d+")$"#).expect("static regex")
});

static FEET_INCHES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\d)\s*['’-]\s*\.?\s*-?\s*(\d{1,2})\s*"?$"#).expect("static regex")
});

static INCHES_OR_CENTIMETRES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{1,3})\s*(in|cm)?$").expect("static regex"));

static FORMATTED_WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+ lbs$").expect("static regex"));

static RAW_WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{2,3})\s*(?:lbs?|#)?$").expect("static regex"));

/// Title-case text that arrives in shouting case.
///
/// Applies only when every space-delimited token is at most two characters,
/// purely numeric, or free of lower-case letters. Text that already has mixed
/// case is returned unchanged.
pub fn to_proper_case(text: &str) -> String {
    let shouting = text.split(' ').all(|token| {
        token.chars().count() <= 2
            || token.chars().all(|c| c.is_ascii_digit())
            || !token.chars().any(char::is_lowercase)
    });
    if !shouting {
        return text.to_string();
    }
    text.split(' ')
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first letter of each alphanumeric run, lower-case the rest.
///
/// `O'NEIL` becomes `O'Neil`, `SMITH-JONES` becomes `Smith-Jones`. Letters
/// whose upper case is more than one character (`ß`) are kept as they are.
fn title_case_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut at_word_start = true;
    for c in token.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                let mut upper = c.to_uppercase();
                match (upper.next(), upper.next()) {
                    (Some(single), None) => out.push(single),
                    _ => out.push(c),
                }
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Reformat an 8-digit `MMDDYYYY` date as `MM/DD/YYYY`.
///
/// Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}/{}/{}", &trimmed[0..2], &trimmed[2..4], &trimmed[4..8])
    } else {
        raw.to_string()
    }
}

/// Render total inches as `F'I"`, or `F'` when the inches are zero.
pub fn feet_inches_from_total_inches(total: u32) -> String {
    let feet = total / 12;
    let inches = total % 12;
    if inches == 0 {
        format!("{feet}'")
    } else {
        format!("{feet}'{inches}\"")
    }
}

/// Normalize a height to `F'I" (N")`.
///
/// Accepts `5-09`, `5'09"`, `5'-09"`, a bare number of inches (`069`), or an
/// AAMVA value with a unit (`069 IN`, `175 CM`). A bare number up to 12 is
/// ambiguous and is kept as inches only (`9"`).
pub fn format_height(raw: &str) -> String {
    let trimmed = raw.trim();
    if FORMATTED_HEIGHT.is_match(trimmed) {
        return trimmed.to_string();
    }

    if let Some(caps) = FEET_INCHES.captures(trimmed) {
        let feet: u32 = caps[1].parse().unwrap_or_default();
        let inches: u32 = caps[2].parse().unwrap_or_default();
        if inches >= 12 {
            return raw.to_string();
        }
        return with_total_inches(feet * 12 + inches);
    }

    if let Some(caps) = INCHES_OR_CENTIMETRES.captures(trimmed) {
        let value: u32 = caps[1].parse().unwrap_or_default();
        let centimetres = caps
            .get(2)
            .is_some_and(|unit| unit.as_str().eq_ignore_ascii_case("cm"));
        if centimetres {
            let inches = (f64::from(value) / 2.54).round() as u32;
            return with_total_inches(inches);
        }
        if value <= 12 {
            return format!("{value}\"");
        }
        return with_total_inches(value);
    }

    raw.to_string()
}

fn with_total_inches(total: u32) -> String {
    format!("{} ({total}\")", feet_inches_from_total_inches(total))
}

/// Normalize a weight in pounds to `N lbs`.
pub fn format_weight(raw: &str) -> String {
    let trimmed = raw.trim();
    if FORMATTED_WEIGHT.is_match(trimmed) {
        return trimmed.to_string();
    }
    match RAW_WEIGHT
        .captures(trimmed)
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        Some(pounds) => format!("{pounds} lbs"),
        None => raw.to_string(),
    }
}

/// Reduce a postal code to its five-digit prefix (`902230000` → `90223`).
pub fn format_zip(raw: &str) -> String {
    let trimmed = raw.trim();
    let shaped = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if shaped && digits.len() >= 5 {
        digits[..5].to_string()
    } else {
        raw.to_string()
    }
}

/// Render a sex code under the default policy.
///
/// See [`SexPolicy`] for the policy point that can override this.
pub fn sex_from_code(code: &str) -> &'static str {
    SexPolicy::Binary.label_for(code)
}

const STATES: [(&str, &str); 51] = [
    ("AL", "ALABAMA"),
    ("AK", "ALASKA"),
    ("AZ", "ARIZONA"),
    ("AR", "ARKANSAS"),
    ("CA", "CALIFORNIA"),
    ("CO", "COLORADO"),
    ("CT", "CONNECTICUT"),
    ("DE", "DELAWARE"),
    ("DC", "DISTRICT OF COLUMBIA"),
    ("FL", "FLORIDA"),
    ("GA", "GEORGIA"),
    ("HI", "HAWAII"),
    ("ID", "IDAHO"),
    ("IL", "ILLINOIS"),
    ("IN", "INDIANA"),
    ("IA", "IOWA"),
    ("KS", "KANSAS"),
    ("KY", "KENTUCKY"),
    ("LA", "LOUISIANA"),
    ("ME", "MAINE"),
    ("MD", "MARYLAND"),
    ("MA", "MASSACHUSETTS"),
    ("MI", "MICHIGAN"),
    ("MN", "MINNESOTA"),
    ("MS", "MISSISSIPPI"),
    ("MO", "MISSOURI"),
    ("MT", "MONTANA"),
    ("NE", "NEBRASKA"),
    ("NV", "NEVADA"),
    ("NH", "NEW HAMPSHIRE"),
    ("NJ", "NEW JERSEY"),
    ("NM", "NEW MEXICO"),
    ("NY", "NEW YORK"),
    ("NC", "NORTH CAROLINA"),
    ("ND", "NORTH DAKOTA"),
    ("OH", "OHIO"),
    ("OK", "OKLAHOMA"),
    ("OR", "OREGON"),
    ("PA", "PENNSYLVANIA"),
    ("RI", "RHODE ISLAND"),
    ("SC", "SOUTH CAROLINA"),
    ("SD", "SOUTH DAKOTA"),
    ("TN", "TENNESSEE"),
    ("TX", "TEXAS"),
    ("UT", "UTAH"),
    ("VT", "VERMONT"),
    ("VA", "VIRGINIA"),
    ("WA", "WASHINGTON"),
    ("WV", "WEST VIRGINIA"),
    ("WI", "WISCONSIN"),
    ("WY", "WYOMING"),
];

/// USPS abbreviation for a US state name or abbreviation, in any case.
pub fn state_abbreviation(name: &str) -> Option<&'static str> {
    let wanted = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    STATES
        .iter()
        .find(|(code, full)| *code == wanted || *full == wanted)
        .map(|(code, _)| *code)
}
