// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Ausweis.
//
// The extraction and matching engine itself is total over its string inputs
// and never produces these; they cover the surfaces around it (reading
// captures from disk, loading configuration, emitting JSON).

use thiserror::Error;

/// Top-level error type for all Ausweis operations.
#[derive(Debug, Error)]
pub enum AusweisError {
    // -- Input --
    #[error("no input given: supply OCR text, a barcode payload, or both")]
    MissingInput,

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AusweisError>;
