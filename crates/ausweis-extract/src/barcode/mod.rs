// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode side: the AAMVA element table, the file header and the dialect-sniffing
// record decoder.

pub mod codes;
pub mod decoder;
pub mod header;

pub use decoder::{BarcodeDecoder, DecodedBarcode, Dialect, decode, detect_dialect};
pub use header::AamvaHeader;
