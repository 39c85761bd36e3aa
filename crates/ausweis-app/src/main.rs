// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ausweis: driver's license front/barcode cross-check.
//
// Entry point. Initialises logging, parses arguments and dispatches to the
// subcommand handlers. Logs go to stderr so `--json` output stays clean.

mod cli;
mod services;

use clap::Parser;

use ausweis_core::review::humanize_error;
use cli::{Cli, Command};
use services::commands::{EXIT_ERROR, run_config, run_decode, run_extract, run_validate};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match &cli.command {
        Command::Validate(args) => run_validate(args, config_path, cli.json),
        Command::Decode(args) => run_decode(args, config_path, cli.json),
        Command::Extract(args) => run_extract(args, config_path, cli.json),
        Command::Config(args) => run_config(args, config_path),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("{}", human.suggestion);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}
