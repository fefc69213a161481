// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Render projection: history and overlays to a flat list of draw commands.
//!
//! The projector is a pure function. Every frame is a full redraw: the
//! caller clears its surface, then replays the commands in order. There is
//! no incremental diffing, so undo and redo are always drawn correctly
//! whatever the surface held before.

use crate::anchor::Overlay;
use crate::history::Action;
use crate::settings;
use crate::theme;
use kurbo::{Line, Point};
use peniko::Color;

/// A single primitive to draw on the surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Stroke a straight line
    Stroke { line: Line, color: Color, width: f64 },
    /// Draw text with its baseline origin at `origin`
    Text {
        origin: Point,
        text: String,
        color: Color,
        font_size: f64,
    },
}

/// Drawing parameters that are not part of the history itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub brush_width: f64,
    pub result_color: Color,
    pub result_font_size: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            brush_width: settings::canvas::BRUSH_WIDTH,
            result_color: theme::result::TEXT,
            result_font_size: theme::result::FONT_SIZE,
        }
    }
}

/// Project visible actions and overlays into draw commands.
///
/// Strokes come first, in action then segment order, followed by one text
/// command per overlay in insertion order.
pub fn project(
    visible_actions: &[Action],
    overlays: &[Overlay],
    style: &RenderStyle,
) -> Vec<DrawCommand> {
    let strokes = visible_actions
        .iter()
        .flat_map(|action| action.segments())
        .map(|seg| DrawCommand::Stroke {
            line: seg.line(),
            color: seg.color,
            width: style.brush_width,
        });

    let texts = overlays.iter().map(|overlay| DrawCommand::Text {
        origin: overlay.anchor,
        text: overlay.text.clone(),
        color: style.result_color,
        font_size: style.result_font_size,
    });

    strokes.chain(texts).collect()
}
