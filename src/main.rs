// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! TheoremX: replay a drawing session against the calculator service

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "theoremx")]
#[command(about = "Replay a drawing session against the calculator service", long_about = None)]
struct Cli {
    /// JSON replay script of pointer, undo, solve and explain steps
    script: PathBuf,
    /// Optional TOML session config
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    theoremx::init_tracing();
    let cli = Cli::parse();

    match theoremx::run(&cli.script, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
