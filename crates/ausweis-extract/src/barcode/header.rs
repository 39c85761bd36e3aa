// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AAMVA file header (`ANSI 636014040002...`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ANSI ?(\d{6})(\d{2})(\d{2})(\d{2})").expect("static regex"));

/// Fixed-width fields following the `ANSI` file type marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AamvaHeader {
    /// Issuer identification number assigned to the jurisdiction.
    pub issuer_id: String,
    pub aamva_version: u8,
    pub jurisdiction_version: u8,
    /// Number of subfile entries that follow.
    pub entries: u8,
}

impl AamvaHeader {
    /// Parse the first header found in `payload`.
    pub fn parse(payload: &str) -> Option<Self> {
        let caps = HEADER.captures(payload)?;
        Some(Self {
            issuer_id: caps[1].to_string(),
            aamva_version: caps[2].parse().ok()?,
            jurisdiction_version: caps[3].parse().ok()?,
            entries: caps[4].parse().ok()?,
        })
    }

    /// Jurisdiction that issued the card, when the IIN is known.
    pub fn jurisdiction(&self) -> Option<&'static str> {
        ISSUERS
            .iter()
            .find(|(iin, _)| *iin == self.issuer_id)
            .map(|(_, state)| *state)
    }
}

const ISSUERS: [(&str, &str); 15] = [
    ("636000", "VA"),
    ("636001", "NY"),
    ("636004", "NC"),
    ("636010", "FL"),
    ("636014", "CA"),
    ("636015", "TX"),
    ("636020", "CO"),
    ("636023", "OH"),
    ("636025", "PA"),
    ("636026", "AZ"),
    ("636032", "MI"),
    ("636035", "IL"),
    ("636036", "NJ"),
    ("636045", "WA"),
    ("636055", "GA"),
];
