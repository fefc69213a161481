// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the drawing core and its collaborators.
//!
//! `GeometryError`, `HistoryError` and `AnchorError` are invariant
//! violations: the session controller never produces them when it sequences
//! calls correctly. `RequestFailure` covers everything that can go wrong
//! talking to the outside world and is always recovered by the controller.

use thiserror::Error;

/// Errors from bounding-box math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A bounding box was requested for zero segments
    #[error("cannot compute a bounding box of an empty segment set")]
    EmptyInput,
}

/// Errors from the action history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A segment was appended while no action was open
    #[error("no active action to append a segment to")]
    NoActiveAction,
}

/// Errors from result anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnchorError {
    /// The action has no segments, so it has no extent to anchor against
    #[error("cannot anchor a result to an action with no segments")]
    EmptyAction,
}

impl From<GeometryError> for AnchorError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::EmptyInput => AnchorError::EmptyAction,
        }
    }
}

/// Any failure of a collaborator call: snapshot, solver or explainer.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),

    #[error("solver reported status {status:?}: {message}")]
    Rejected { status: String, message: String },

    #[error("{0}")]
    Other(String),
}
