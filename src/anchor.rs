// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Result anchoring: where solver output is drawn relative to a gesture.

use crate::error::AnchorError;
use crate::geometry::bounding_box_of;
use crate::history::Action;
use kurbo::Point;

/// A solver result pinned next to the gesture it was computed for.
///
/// Overlays live outside the action history, so undo never removes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub anchor: Point,
    pub text: String,
    /// Index of the action the anchor was derived from
    pub source_action: usize,
}

/// Anchor point for results of `action`: `margin` units right of its
/// rightmost extent, vertically centered on its extent.
pub fn anchor_for(action: &Action, margin: f64) -> Result<Point, AnchorError> {
    let bbox = bounding_box_of(action.segments())?;
    Ok(Point::new(
        bbox.max_x + margin,
        (bbox.min_y + bbox.max_y) / 2.0,
    ))
}
