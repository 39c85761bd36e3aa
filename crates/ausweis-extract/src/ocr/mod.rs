// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Front-of-card OCR text extraction.

pub mod extractor;
pub mod rules;

pub use extractor::{Ambiguity, OcrExtraction, OcrExtractor, extract};
