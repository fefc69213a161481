// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration loaded from TOML.
//!
//! Every field is optional; missing ones fall back to `settings`.

use crate::client::{HttpClient, RasterSnapshot};
use crate::render::RenderStyle;
use crate::session::{SessionOptions, StalePolicy};
use crate::settings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub solver: SolverConfig,
    pub canvas: CanvasConfig,
    pub session: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: settings::solver::BASE_URL.to_string(),
            timeout_secs: settings::solver::TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub brush_width: f64,
    pub anchor_margin: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: settings::canvas::WIDTH,
            height: settings::canvas::HEIGHT,
            brush_width: settings::canvas::BRUSH_WIDTH,
            anchor_margin: settings::anchor::MARGIN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub stale_responses: StalePolicy,
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid session config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            anchor_margin: self.canvas.anchor_margin,
            stale_policy: self.session.stale_responses,
            style: RenderStyle {
                brush_width: self.canvas.brush_width,
                ..RenderStyle::default()
            },
        }
    }

    pub fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot::new(self.canvas.width, self.canvas.height)
    }

    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::new(
            self.solver.base_url.clone(),
            Duration::from_secs(self.solver.timeout_secs),
        )
        .context("Failed to build HTTP client")
    }
}
