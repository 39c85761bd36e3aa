// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered pattern rules for front-of-card OCR text.
//
// Order is priority: for each field the first rule that renders a value wins.
// Several fields appear in more than one noisy surface form (`HGT 5'9"`, a bare
// `5'9"`, `HGT 069`), so the most specific or most artifact-tolerant form is
// listed first.

use ausweis_core::config::ExtractionConfig;
use ausweis_core::Field;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::normalize::{format_date, format_height, format_weight, state_abbreviation, to_proper_case};

/// Turns a match into a display value; `None` rejects this match and the
/// search continues further along the text.
pub type Render = fn(&Captures<'_>, &ExtractionConfig) -> Option<String>;

/// One entry of the cascade.
pub struct PatternRule {
    /// Stable identifier used in logs and ambiguity reports.
    pub id: &'static str,
    pub field: Field,
    pub pattern: Regex,
    pub render: Render,
    /// Labels that, printed directly before a match, disqualify it.
    pub reject_after: &'static [&'static str],
    /// Matches starting inside a holder-name run are disqualified.
    pub outside_name_runs: bool,
}

impl PatternRule {
    fn rejecting_after(mut self, labels: &'static [&'static str]) -> Self {
        self.reject_after = labels;
        self
    }

    fn outside_name_runs(mut self) -> Self {
        self.outside_name_runs = true;
        self
    }

    /// Whether a match starting at `start` is disqualified, either by a
    /// rejecting label just before it or by sitting inside a name run.
    pub fn is_rejected_at(&self, text: &str, start: usize) -> bool {
        let before = text[..start].trim_end().trim_end_matches([':', '.']);
        self.reject_after.iter().any(|label| before.ends_with(label))
            || (self.outside_name_runs && within_name_run(text, start))
    }
}

/// Whether `start` lies inside a run on its line that reads as a name.
fn within_name_run(text: &str, start: usize) -> bool {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let line = &text[line_start..line_end];
    let offset = start - line_start;

    let mut from = 0;
    while let Some(caps) = NAME_RUN.captures_at(line, from) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        if whole.start() > offset {
            break;
        }
        if whole.range().contains(&offset) && name_tokens(&caps).is_some() {
            return true;
        }
        from = whole.start() + line[whole.start()..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn rule(id: &'static str, field: Field, pattern: &str, render: Render) -> PatternRule {
    PatternRule {
        id,
        field,
        pattern: Regex::new(pattern).expect("static OCR pattern"),
        render,
        reject_after: &[],
        outside_name_runs: false,
    }
}

const NAME_RUN_PATTERN: &str =
    r"\b([A-Z][A-Z'\-]+)[ \t]+([A-Z][A-Z'\-]+)[ \t]+([A-Z][A-Z'\-]+)\b";

static NAME_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(NAME_RUN_PATTERN).expect("static regex"));

const COLORS: &str = "DICHROMATIC|MULTICOLOR|MAROON|VIOLET|BROWN|GREEN|HAZEL|BLACK|AMBER|BLUE|GRAY|GREY|PINK|BRWN|BLUGRN|GRNBLU|BLK|BLU|BRO|BRN|GRY|GRN|HAZ|HZL|MAR|PNK|DIC|AMB|VIO|MUL";

const STREET_SUFFIXES: &str = "ST|AVE|RD|BLVD|DR|LN|CT|PL|WAY|CIR|PKWY|HWY";

/// Words printed on cards that are never part of the holder's name.
const LABEL_WORDS: [&str; 40] = [
    "DRIVER", "DRIVERS", "DRIVER'S", "LICENSE", "LICENCE", "IDENTIFICATION", "CARD", "CLASS",
    "DOB", "EXP", "ISS", "SEX", "HGT", "WGT", "EYES", "EYE", "HAIR", "RSTR", "RESTR", "END",
    "NONE", "DL", "NO", "USA", "STATE", "OF", "DONOR", "VETERAN", "REAL", "ID", "FEDERAL",
    "LIMITS", "APPLY", "DD", "LN", "FN", "ORGAN", "COMMERCIAL", "NOT", "VALID",
];

/// Words of multi-word state names that are not states on their own.
const STATE_NAME_PARTS: [&str; 14] = [
    "NEW", "NORTH", "SOUTH", "WEST", "RHODE", "ISLAND", "DISTRICT", "COLUMBIA", "YORK",
    "CAROLINA", "DAKOTA", "HAMPSHIRE", "JERSEY", "MEXICO",
];

fn is_label_word(token: &str) -> bool {
    LABEL_WORDS.contains(&token)
        || STATE_NAME_PARTS.contains(&token)
        || STREET_SUFFIXES.split('|').any(|suffix| suffix == token)
        || state_abbreviation(token).is_some()
}

// -- Renderers ----------------------------------------------------------------

fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index).map(|m| m.as_str().trim().to_string())
}

/// Name printed as `LAST FIRST MIDDLE`; rejects runs containing label words.
fn name_tokens<'t>(caps: &Captures<'t>) -> Option<[&'t str; 3]> {
    let tokens = [
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    ];
    if tokens.iter().any(|token| is_label_word(token)) {
        return None;
    }
    Some(tokens)
}

fn render_full_name(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let [last, first, middle] = name_tokens(caps)?;
    Some(to_proper_case(&format!("{first} {middle} {last}")))
}

fn render_name_first(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    name_tokens(caps).map(|[_, first, _]| to_proper_case(first))
}

fn render_name_middle(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    name_tokens(caps).map(|[_, _, middle]| to_proper_case(middle))
}

fn render_name_last(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    name_tokens(caps).map(|[last, _, _]| to_proper_case(last))
}

fn render_labeled_name(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let value = group(caps, 1)?;
    (!is_label_word(&value)).then(|| to_proper_case(&value))
}

fn render_labeled_middle(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 2).map(|value| to_proper_case(&value))
}

fn render_proper(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|value| to_proper_case(&value))
}

fn render_upper(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|value| value.to_ascii_uppercase())
}

fn render_slash_date(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|value| value.replace('-', "/"))
}

fn render_compact_date(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|value| format_date(&value))
}

fn render_sex(caps: &Captures<'_>, config: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|code| config.sex_policy.label_for(&code).to_string())
}

/// Height from separate feet and inches groups. Impossible inches reject.
fn render_feet_inches(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let raw = format!("{}-{}", group(caps, 1)?, group(caps, 2)?);
    let height = format_height(&raw);
    (height != raw).then_some(height)
}

fn render_inches(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let raw = group(caps, 1)?;
    let height = format_height(&raw);
    (height != raw).then_some(height)
}

fn render_weight(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    group(caps, 1).map(|value| format_weight(&value))
}

fn render_state_heading(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let heading = group(caps, 1)?;
    if let Some(code) = state_abbreviation(&heading) {
        return Some(code.to_string());
    }
    let words: Vec<&str> = heading
        .split_whitespace()
        .filter(|word| !LABEL_WORDS.contains(word))
        .collect();
    if let Some(code) = words.iter().rev().find_map(|word| state_abbreviation(word)) {
        return Some(code.to_string());
    }
    words.last().map(|word| to_proper_case(word))
}

fn render_city(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    state_abbreviation(caps.get(2)?.as_str())?;
    let city = group(caps, 1)?;
    // A street line run onto the city line: keep what follows the suffix.
    let words: Vec<&str> = city.split_whitespace().collect();
    let after_street = words
        .iter()
        .rposition(|word| STREET_SUFFIXES.split('|').any(|suffix| suffix == *word))
        .map_or(&words[..], |index| &words[index + 1..]);
    if after_street.is_empty() || after_street.iter().any(|word| LABEL_WORDS.contains(word)) {
        return None;
    }
    Some(to_proper_case(&after_street.join(" ")))
}

fn render_city_state(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    state_abbreviation(caps.get(2)?.as_str()).map(str::to_string)
}

fn render_city_zip(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    state_abbreviation(caps.get(2)?.as_str())?;
    group(caps, 3)
}

fn render_listing(caps: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    let value = group(caps, 1)?.to_ascii_uppercase();
    (value != "NONE").then_some(value)
}

fn render_yes(_: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    Some("Yes".to_string())
}

fn render_no(_: &Captures<'_>, _: &ExtractionConfig) -> Option<String> {
    Some("No".to_string())
}

// -- Cascade ------------------------------------------------------------------

/// The full cascade, in priority order.
pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    let name_run = NAME_RUN_PATTERN;
    let date = r"(\d{2}[/-]\d{2}[/-]\d{4})\b";
    let city_comma = r"\b([A-Z][A-Z .]*?[A-Z]),[ \t]*([A-Z]{2})[ \t]+(\d{5})(?:-\d{4})?\b";
    let city_bare = r"\b([A-Z]{2,})[ \t]+([A-Z]{2})[ \t]+(\d{5})(?:-\d{4})?\b";

    vec![
        // Name: three-token run printed last-name first.
        rule("name.run", Field::Name, name_run, render_full_name),
        rule("name.run.first", Field::FirstName, name_run, render_name_first),
        rule("name.run.middle", Field::MiddleName, name_run, render_name_middle),
        rule("name.run.last", Field::LastName, name_run, render_name_last),
        // Name: numbered or lettered card labels.
        rule(
            "name.label.last",
            Field::LastName,
            r"(?m)^[ \t]*(?:1|LN)[ \t]+([A-Z][A-Z'\-]+)[ \t]*$",
            render_labeled_name,
        ),
        rule(
            "name.label.first",
            Field::FirstName,
            r"(?m)^[ \t]*(?:2|FN)[ \t]+([A-Z][A-Z'\-]+)(?:[ \t]+([A-Z][A-Z'\-]+))?[ \t]*$",
            render_labeled_name,
        ),
        rule(
            "name.label.middle",
            Field::MiddleName,
            r"(?m)^[ \t]*(?:2|FN)[ \t]+([A-Z][A-Z'\-]+)(?:[ \t]+([A-Z][A-Z'\-]+))[ \t]*$",
            render_labeled_middle,
        ),
        // Dates.
        rule("dob.label", Field::DateOfBirth, &format!(r"\bDOB[:.]?\s*{date}"), render_slash_date),
        rule("dob.compact", Field::DateOfBirth, r"\bDOB[:.]?\s*(\d{8})\b", render_compact_date),
        rule("iss.label", Field::IssueDate, &format!(r"\bISS[:.]?\s*{date}"), render_slash_date),
        rule("exp.label", Field::ExpirationDate, &format!(r"\bEXP[:.]?\s*{date}"), render_slash_date),
        // License number.
        rule("license.no", Field::DriverLicenseNumber, r"\bNO[:.]?\s*([A-Z]\d{4,})\b", render_upper),
        rule("license.dl", Field::DriverLicenseNumber, r"\bDL[:.]?\s*([A-Z]\d{4,})\b", render_upper),
        // State.
        rule(
            "state.heading",
            Field::State,
            r"\b([A-Z]{2,}(?:[ \t]+[A-Z]{2,})?)[ \t]+(?:USA[ \t]+)?DRIVER'?S?[ \t]+LICEN[CS]E\b",
            render_state_heading,
        ),
        // Sex.
        rule("sex.artifact", Field::Sex, r"\b([MF])\d(?:\D|$)", render_sex),
        rule("sex.before", Field::Sex, r"\b([MF])[ \t]+SEX\b", render_sex),
        rule("sex.after", Field::Sex, r"\bSEX[:.]?[ \t]*([MF])\b", render_sex),
        // Height.
        rule("height.artifact", Field::Height, r"\b(\d)['’]\.?-(\d{2})\b", render_feet_inches),
        rule(
            "height.label",
            Field::Height,
            r"\bHGT[:.]?[ \t]*(\d)['’-][ \t]*(\d{1,2})\b",
            render_feet_inches,
        ),
        rule("height.bare", Field::Height, r#"\b(\d)['’][ \t]?(\d{1,2})""#, render_feet_inches),
        rule("height.inches", Field::Height, r"\bHGT[:.]?[ \t]*(\d{2,3})\b", render_inches),
        // Weight.
        rule("weight.bare", Field::Weight, r"(?i)\b(\d{3})[ \t]?lbs?\b", render_weight),
        rule("weight.label", Field::Weight, r"\bWGT[:.]?[ \t]*(\d{2,3})\b", render_weight),
        // Eye colour: bare token first, then label-adjacent forms.
        rule("eyes.bare", Field::EyeColor, &format!(r"\b({COLORS})\b"), render_proper)
            .rejecting_after(&["HAIR", "HAI"])
            .outside_name_runs(),
        rule("eyes.label", Field::EyeColor, &format!(r"\bEYES[:]?[ \t]*({COLORS})\b"), render_proper),
        rule("eyes.suffix", Field::EyeColor, &format!(r"\b({COLORS})[ \t]+EYES\b"), render_proper),
        rule("eyes.dotted", Field::EyeColor, &format!(r"\bEYES\.[ \t]*({COLORS})\b"), render_proper),
        rule("hair.label", Field::HairColor, &format!(r"\bHAIR[:.]?[ \t]*({COLORS})\b"), render_proper),
        // Address.
        rule(
            "address.street",
            Field::Address,
            &format!(r"\b(\d+[ \t]+[A-Z0-9 .]*?\b(?:{STREET_SUFFIXES}))\b"),
            render_proper,
        ),
        rule("city.comma", Field::City, city_comma, render_city),
        rule("city.bare", Field::City, city_bare, render_city),
        rule("zip.comma", Field::ZipCode, city_comma, render_city_zip),
        rule("zip.bare", Field::ZipCode, city_bare, render_city_zip),
        rule("state.city_line", Field::State, city_comma, render_city_state),
        // Licensing details.
        rule("class.label", Field::Class, r"\bCLASS[:.]?[ \t]*([A-Z0-9]{1,2})\b", render_upper),
        rule(
            "restrictions.label",
            Field::Restrictions,
            r"\b(?:RSTR|RESTR|RESTRICTIONS?)[:.]?[ \t]*([A-Z0-9]{1,6})\b",
            render_listing,
        ),
        rule(
            "endorsements.label",
            Field::Endorsements,
            r"\b(?:END|ENDORSEMENTS?)[:.]?[ \t]*([A-Z0-9]{1,6})\b",
            render_listing,
        ),
        rule("veteran.label", Field::Veteran, r"\bVETERAN\b", render_yes),
        rule("donor.label", Field::OrganDonor, r"\b(?:ORGAN[ \t]+)?DONOR\b", render_yes),
        rule("real_id.label", Field::RealId, r"\bREAL[ \t-]?ID\b", render_yes),
        rule("real_id.limits", Field::RealId, r"\bFEDERAL[ \t]+LIMITS[ \t]+APPLY\b", render_no),
    ]
});
