// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AusweisError, Result};

/// Upper bounds accepted for the word-overlap bonus settings.
pub const MAX_POINTS_PER_WORD: u32 = 100;
pub const MAX_WORD_MATCHES: u32 = 1_000;

/// Settings for one validation engine instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub extraction: ExtractionConfig,
    pub matching: MatchingConfig,
}

impl EngineConfig {
    /// Reject settings the matcher cannot score with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.partial_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AusweisError::Config(format!(
                "matching.partial_threshold must be within 0.0..=1.0, got {threshold}"
            )));
        }
        let MatchingConfig {
            points_per_word,
            max_word_matches,
            ..
        } = self.matching;
        if points_per_word > MAX_POINTS_PER_WORD {
            return Err(AusweisError::Config(format!(
                "matching.points_per_word must be at most {MAX_POINTS_PER_WORD}, got {points_per_word}"
            )));
        }
        if max_word_matches > MAX_WORD_MATCHES {
            return Err(AusweisError::Config(format!(
                "matching.max_word_matches must be at most {MAX_WORD_MATCHES}, got {max_word_matches}"
            )));
        }
        Ok(())
    }
}

/// Policy knobs shared by the barcode decoder and the OCR extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub sex_policy: SexPolicy,
    pub embedded_scan: EmbeddedScanMode,
}

/// How sex codes are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexPolicy {
    /// `1`/`M` is Male, everything else is Female.
    ///
    /// Unknown and non-binary codes collapse to Female. This is the
    /// long-standing behaviour and stays the default until product decides
    /// otherwise.
    #[default]
    Binary,
    /// `1`/`M` is Male, `2`/`F` is Female, anything else is `Not Specified`.
    Explicit,
}

impl SexPolicy {
    /// Render a sex code (`1`, `2`, `M`, `F`, ...) as a display value.
    ///
    /// Already-rendered values map to themselves.
    pub fn label_for(&self, code: &str) -> &'static str {
        let code = code.trim().to_ascii_uppercase();
        let male = matches!(code.as_str(), "1" | "M" | "MALE");
        let female = matches!(code.as_str(), "2" | "F" | "FEMALE");
        match self {
            Self::Binary if male => "Male",
            Self::Binary => "Female",
            Self::Explicit if male => "Male",
            Self::Explicit if female => "Female",
            Self::Explicit => "Not Specified",
        }
    }
}

/// Strictness of the embedded element-code scan that recovers fields from
/// mis-segmented barcode payloads.
///
/// The scan can pick up coincidental three-letter prefixes in unrelated
/// text; stricter modes trade recall for fewer false positives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedScanMode {
    /// Split on every candidate delimiter, including spaces.
    #[default]
    Lenient,
    /// Split on record delimiters only (no spaces).
    Strict,
    /// Do not scan.
    Disabled,
}

impl EmbeddedScanMode {
    /// Delimiters the payload is split on.
    pub fn delimiters(&self) -> &'static [char] {
        match self {
            Self::Lenient => &['\n', '\r', ' ', '$', '^', '|'],
            Self::Strict => &['\n', '\r', '$', '^', '|'],
            Self::Disabled => &[],
        }
    }
}

/// Cross-document scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Similarity above which an unequal pair counts as a partial match.
    pub partial_threshold: f64,
    /// Points per significant word shared by the two raw texts.
    pub points_per_word: u32,
    /// Shared words beyond this count earn nothing more.
    pub max_word_matches: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            partial_threshold: 0.7,
            points_per_word: 2,
            max_word_matches: 15,
        }
    }
}

impl MatchingConfig {
    /// Ceiling of the word-overlap bonus. Saturates for unvalidated settings.
    pub fn word_overlap_ceiling(&self) -> u32 {
        self.points_per_word.saturating_mul(self.max_word_matches)
    }
}
