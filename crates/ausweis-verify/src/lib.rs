// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ausweis: cross-checks the front of a driver's license against its barcode.

pub mod matcher;
pub mod pipeline;
pub mod validity;

pub use matcher::{Matcher, compare};
pub use pipeline::{ValidationOutcome, Validator, validate};
pub use validity::{DocumentValidity, ValidityWarning, assess};
