// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! TheoremX: drawing history, result anchoring and solver session core
//! for a handwritten math canvas

pub mod anchor;
pub mod client;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod markup;
pub mod render;
pub mod replay;
pub mod session;
pub mod settings;
pub mod theme;

use anyhow::{Context, Result};
use config::SessionConfig;
use replay::Runner;
use session::SessionController;
use std::path::Path;

/// Install the tracing subscriber (controlled via RUST_LOG)
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("theoremx=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Replay a JSON event script against the configured calculator service
/// and print the resulting overlays, bindings and explanation.
pub fn run(script_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let steps = replay::parse_script(&script)?;
    tracing::info!(
        "Replaying {} step(s) from {} against {}",
        steps.len(),
        script_path.display(),
        config.solver.base_url
    );

    let snapshot = config.snapshot();
    let client = config.http_client()?;
    let mut session = SessionController::new(config.session_options());
    let mut runner = Runner::new(&snapshot, &client, &client);
    let outcomes = runner.run(&mut session, &steps)?;

    tracing::debug!("Request outcomes: {:?}", outcomes);
    print_summary(&session);
    Ok(())
}

fn print_summary(session: &SessionController) {
    for overlay in session.overlays() {
        println!(
            "result {:>8.1} {:>8.1}  {}  (action {})",
            overlay.anchor.x, overlay.anchor.y, overlay.text, overlay.source_action
        );
    }
    for (name, value) in session.bindings().iter() {
        println!("binding {name} = {value}");
    }
    if let Some(explanation) = session.latest_explanation() {
        for paragraph in markup::paragraphs(explanation) {
            println!("\n{}", paragraph.text);
        }
    }
    if let Some(notice) = session.notice() {
        eprintln!("{}", notice.display());
    }
}
