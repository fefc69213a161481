// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Built-in defaults for the canvas, anchoring and remote solver.
//!
//! These are compile-time fallbacks; `config::SessionConfig` overrides them
//! at runtime. Visual styling (colors, palette) belongs in `theme.rs`.

// ============================================================================
// CANVAS SETTINGS
// ============================================================================
/// Snapshot width in canvas units (pixels)
const CANVAS_WIDTH: u32 = 1280;

/// Snapshot height in canvas units (pixels)
const CANVAS_HEIGHT: u32 = 800;

/// Brush thickness for freehand strokes
const BRUSH_WIDTH: f64 = 8.0;

// ============================================================================
// ANCHOR SETTINGS
// ============================================================================
/// Horizontal gap between a gesture's rightmost extent and its result text
const ANCHOR_MARGIN: f64 = 50.0;

// ============================================================================
// SOLVER SETTINGS
// ============================================================================
/// Base URL of the calculator service
const SOLVER_BASE_URL: &str = "http://localhost:8900";

/// Request timeout in seconds. Vision models are slow, keep this generous.
const SOLVER_TIMEOUT_SECS: u64 = 60;

/// Question sent when the user asks for steps without typing one
const DEFAULT_EXPLAIN_QUESTION: &str = "Explain the solution to this problem";

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Canvas dimensions and stroke settings
pub mod canvas {
    /// Snapshot width (pixels)
    pub const WIDTH: u32 = super::CANVAS_WIDTH;

    /// Snapshot height (pixels)
    pub const HEIGHT: u32 = super::CANVAS_HEIGHT;

    /// Brush thickness
    pub const BRUSH_WIDTH: f64 = super::BRUSH_WIDTH;
}

/// Result anchoring
pub mod anchor {
    /// Gap to the right of the anchored gesture
    pub const MARGIN: f64 = super::ANCHOR_MARGIN;
}

/// Remote calculator service
pub mod solver {
    pub const BASE_URL: &str = super::SOLVER_BASE_URL;
    pub const TIMEOUT_SECS: u64 = super::SOLVER_TIMEOUT_SECS;
    pub const DEFAULT_EXPLAIN_QUESTION: &str = super::DEFAULT_EXPLAIN_QUESTION;
}
