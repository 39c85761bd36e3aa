// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers. Each returns the process exit code on success.

use std::path::Path;

use ausweis_core::error::Result;
use ausweis_core::{AusweisError, EngineConfig, RawDocumentInput};
use ausweis_extract::{BarcodeDecoder, OcrExtractor};
use ausweis_verify::Validator;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use super::config_store::{default_config_path, load_config, persist_config};
use super::render::{fields_table, outcome_summary};
use crate::cli::{ConfigArgs, InputArgs, ValidateArgs};

/// Completed without anything needing attention.
pub const EXIT_OK: i32 = 0;
/// Could not run, e.g. unreadable input or settings.
pub const EXIT_ERROR: i32 = 1;
/// Completed, but a person has to check the card.
pub const EXIT_REVIEW: i32 = 2;

fn read_capture(path: Option<&Path>) -> Result<Option<String>> {
    path.map(std::fs::read_to_string).transpose().map_err(AusweisError::from)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>, json: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    validate_files(args, &config, Local::now().date_naive(), json)
}

/// Validate the captures named by `args` as of `today`.
pub fn validate_files(
    args: &ValidateArgs,
    config: &EngineConfig,
    today: NaiveDate,
    json: bool,
) -> Result<i32> {
    let input = RawDocumentInput::new(
        read_capture(args.front.as_deref())?,
        read_capture(args.barcode.as_deref())?,
    );
    let outcome = Validator::new(config)?.validate(&input, today)?;

    if json {
        print_json(&outcome)?;
    } else {
        print!("{}", outcome_summary(&outcome));
    }
    Ok(if outcome.needs_manual_review() {
        EXIT_REVIEW
    } else {
        EXIT_OK
    })
}

pub fn run_decode(args: &InputArgs, config_path: Option<&Path>, json: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    let payload = std::fs::read_to_string(&args.file)?;
    let decoded = BarcodeDecoder::new(config.extraction).decode_detailed(&payload);

    if json {
        print_json(&decoded)?;
    } else {
        println!("Dialect: {:?}", decoded.dialect);
        if let Some(state) = decoded.header.as_ref().and_then(|header| header.jurisdiction()) {
            println!("Issuer:  {state}");
        }
        print!("{}", fields_table(&decoded.fields));
    }
    Ok(EXIT_OK)
}

pub fn run_extract(args: &InputArgs, config_path: Option<&Path>, json: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    let text = std::fs::read_to_string(&args.file)?;
    let extraction = OcrExtractor::new(config.extraction).extract_detailed(&text);

    if json {
        print_json(&extraction)?;
    } else {
        print!("{}", fields_table(&extraction.fields));
        for ambiguity in &extraction.ambiguities {
            println!(
                "  note: {} read differently by {} (kept {})",
                ambiguity.field, ambiguity.rejected_rule, ambiguity.kept_rule
            );
        }
    }
    Ok(EXIT_OK)
}

pub fn run_config(args: &ConfigArgs, config_path: Option<&Path>) -> Result<i32> {
    let target = config_path.map_or_else(default_config_path, Path::to_path_buf);
    if args.init {
        if target.exists() {
            info!(path = %target.display(), "Settings file already present, left unchanged");
        } else {
            persist_config(&target, &EngineConfig::default())?;
        }
    }
    let config = load_config(config_path)?;
    println!("# {}", target.display());
    print_json(&config)?;
    Ok(EXIT_OK)
}
