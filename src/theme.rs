// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Theme colors and constants
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use peniko::Color;

// ============================================================================
// STROKES
// ============================================================================
// The canvas starts dark, so the initial brush is white.
const DEFAULT_STROKE: Color = Color::from_rgb8(0xff, 0xff, 0xff);

// ============================================================================
// RESULT OVERLAYS
// ============================================================================
const RESULT_TEXT: Color = Color::from_rgb8(0x3b, 0x82, 0xf6);
const RESULT_FONT_SIZE: f64 = 40.0;

// ============================================================================
// PALETTE SWATCHES -- Four rows of six, in display order
// ============================================================================
const SWATCHES: [Color; 24] = [
    // Basic colors
    Color::from_rgb8(0x00, 0x00, 0x00), // Black
    Color::from_rgb8(0x33, 0x33, 0x33), // Dark Gray
    Color::from_rgb8(0x66, 0x66, 0x66), // Medium Gray
    Color::from_rgb8(0x99, 0x99, 0x99), // Light Gray
    Color::from_rgb8(0xcc, 0xcc, 0xcc), // Lighter Gray
    Color::from_rgb8(0xff, 0xff, 0xff), // White
    // Vivid colors
    Color::from_rgb8(0xff, 0x00, 0x00), // Red
    Color::from_rgb8(0xff, 0x66, 0x00), // Orange
    Color::from_rgb8(0xff, 0xcc, 0x00), // Yellow
    Color::from_rgb8(0x33, 0xcc, 0x33), // Green
    Color::from_rgb8(0x00, 0x99, 0xff), // Light Blue
    Color::from_rgb8(0x00, 0x00, 0xff), // Blue
    // Pastel colors
    Color::from_rgb8(0xff, 0x99, 0x99), // Light Red
    Color::from_rgb8(0xff, 0xcc, 0x99), // Light Orange
    Color::from_rgb8(0xff, 0xff, 0x99), // Light Yellow
    Color::from_rgb8(0x99, 0xff, 0x99), // Light Green
    Color::from_rgb8(0x99, 0xff, 0xff), // Light Cyan
    Color::from_rgb8(0x99, 0x99, 0xff), // Light Blue
    // Additional colors
    Color::from_rgb8(0x99, 0x00, 0x00), // Dark Red
    Color::from_rgb8(0xff, 0x00, 0xff), // Magenta
    Color::from_rgb8(0x00, 0xff, 0xff), // Cyan
    Color::from_rgb8(0x00, 0xcc, 0x66), // Teal
    Color::from_rgb8(0x66, 0x00, 0xcc), // Purple
    Color::from_rgb8(0xff, 0x33, 0x99), // Pink
];

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Freehand stroke colors
pub mod stroke {
    use super::*;
    /// Brush color before the user picks a swatch
    pub const DEFAULT: Color = DEFAULT_STROKE;
}

/// Solver result text drawn next to a gesture
pub mod result {
    use super::*;
    pub const TEXT: Color = RESULT_TEXT;
    pub const FONT_SIZE: f64 = RESULT_FONT_SIZE;
}

/// Color palette offered to the user
pub mod palette {
    use super::*;
    pub const SWATCHES: [Color; 24] = super::SWATCHES;

    /// Parse a CSS color string (`#FF0000`, `rgb(255, 255, 255)`, named
    /// colors) into a palette color.
    pub fn parse(css: &str) -> Option<Color> {
        peniko::color::parse_color(css)
            .ok()
            .map(|c| c.to_alpha_color::<peniko::color::Srgb>())
    }
}
