// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry primitives: stroke segments and bounding boxes.
//!
//! Everything here works on stored segment data only. Nothing reads back
//! from a drawing surface, so results depend on the history alone.

use crate::error::GeometryError;
use kurbo::{Line, Point, Rect};
use peniko::Color;

// ============================================================================
// SEGMENT
// ============================================================================

/// One straight piece of a freehand stroke, the atomic drawable unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: Color,
}

impl Segment {
    pub fn new(start: Point, end: Point, color: Color) -> Self {
        Self { start, end, color }
    }

    /// The segment as a kurbo line (for stroking and hit math)
    pub fn line(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

// ============================================================================
// BOUNDING BOX
// ============================================================================

/// Axis-aligned extent of a set of segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The reduction identity: any real point widens it on the first fold.
    const EMPTY: BoundingBox = BoundingBox {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Compute the bounding box over every start and end point of `segments`.
///
/// The fold uses min/max from infinite sentinels, so the result does not
/// depend on segment order.
pub fn bounding_box_of(segments: &[Segment]) -> Result<BoundingBox, GeometryError> {
    if segments.is_empty() {
        return Err(GeometryError::EmptyInput);
    }

    Ok(segments
        .iter()
        .fold(BoundingBox::EMPTY, |bbox, seg| {
            bbox.include(seg.start).include(seg.end)
        }))
}
