// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Collaborator boundary: snapshotting the canvas and talking to the
//! remote solver and explainer.
//!
//! The session controller never calls these traits itself. It hands out
//! request tickets; whoever drives the session (see `replay`) captures a
//! snapshot, performs the call and feeds the result back.

mod http;
mod snapshot;

pub use http::HttpClient;
pub use snapshot::RasterSnapshot;

use crate::error::RequestFailure;
use crate::render::DrawCommand;
use crate::session::{ChatEntry, VariableBindings};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// IMAGE BLOB
// ============================================================================

/// Encoded snapshot of the drawing surface. The core never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: "image/png",
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>` form, as produced by a browser canvas
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

// ============================================================================
// SOLVER RESULT
// ============================================================================

/// One recognized expression returned by the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveItem {
    #[serde(deserialize_with = "string_or_scalar")]
    pub expr: String,
    #[serde(deserialize_with = "string_or_scalar")]
    pub result: String,
    /// True when the item binds `expr` (a variable name) to `result`
    #[serde(default)]
    pub assign: bool,
}

impl SolveItem {
    pub fn new(expr: impl Into<String>, result: impl Into<String>, assign: bool) -> Self {
        Self {
            expr: expr.into(),
            result: result.into(),
            assign,
        }
    }
}

/// The solver is a vision model and answers with numbers as often as
/// strings, so accept any JSON scalar and keep its textual form.
fn string_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Produces an encoded image of the current frame
pub trait SnapshotProvider {
    fn capture(&self, frame: &[DrawCommand]) -> Result<ImageBlob, RequestFailure>;
}

/// Recognizes and solves the expressions in a snapshot
pub trait Solver {
    fn solve(
        &self,
        image: &ImageBlob,
        bindings: &VariableBindings,
    ) -> Result<Vec<SolveItem>, RequestFailure>;
}

/// Produces a step-by-step explanation of a snapshot
pub trait Explainer {
    fn explain(
        &self,
        image: &ImageBlob,
        question: &str,
        history: &[ChatEntry],
    ) -> Result<String, RequestFailure>;
}
