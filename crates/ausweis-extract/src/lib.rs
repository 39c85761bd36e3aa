// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ausweis: field extraction from both sides of a driver's license.
//
// `barcode` decodes the PDF417 text payload on the back, `ocr` pulls fields out
// of recognised front-of-card text, and `normalize` holds the value formatting
// both share so that equal facts render as equal strings.

pub mod barcode;
pub mod normalize;
pub mod ocr;

pub use barcode::{BarcodeDecoder, DecodedBarcode, Dialect};
pub use ocr::{Ambiguity, OcrExtraction, OcrExtractor};
