// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ausweis",
    version,
    about = "Cross-check the front of a driver's license against its barcode",
    long_about = "Reads recognised front-of-card text and the decoded PDF417 barcode\n\
                  payload, extracts the identity fields from each, and scores how well\n\
                  they agree. Exits 2 when the result needs a person to look at it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: $XDG_CONFIG_HOME/ausweis/config.json).
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract, compare and assess both sides of one card.
    Validate(ValidateArgs),

    /// Decode a barcode payload only.
    Decode(InputArgs),

    /// Extract fields from front-of-card OCR text only.
    Extract(InputArgs),

    /// Show the effective settings, or write the defaults.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// File holding the OCR text of the front of the card.
    #[arg(long, value_name = "FILE")]
    pub front: Option<PathBuf>,

    /// File holding the raw barcode payload from the back of the card.
    #[arg(long, value_name = "FILE")]
    pub barcode: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the default settings to the settings file if none exists.
    #[arg(long)]
    pub init: bool,
}
