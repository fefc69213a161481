// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Raster snapshot of a projected frame, encoded as PNG.
//!
//! Strokes are rasterized with round caps onto a transparent canvas, the
//! same thing a browser canvas `toDataURL("image/png")` would hand to the
//! solver. Text overlays are skipped: the solver is only interested in the
//! user's marks, and overlay text would need a font stack.

use super::{ImageBlob, SnapshotProvider};
use crate::error::RequestFailure;
use crate::render::DrawCommand;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use kurbo::{Line, ParamCurveNearest, Point};
use peniko::Color;
use std::io::Cursor;

/// Tolerance for nearest-point queries, in pixels
const NEAREST_ACCURACY: f64 = 1e-6;

/// Snapshot provider that rasterizes stroke commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSnapshot {
    pub width: u32,
    pub height: u32,
}

impl RasterSnapshot {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rasterize the frame without encoding it
    pub fn rasterize(&self, frame: &[DrawCommand]) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for command in frame {
            if let DrawCommand::Stroke { line, color, width } = command {
                stroke_line(&mut image, *line, *color, *width);
            }
        }
        image
    }
}

impl SnapshotProvider for RasterSnapshot {
    fn capture(&self, frame: &[DrawCommand]) -> Result<ImageBlob, RequestFailure> {
        let image = self.rasterize(frame);
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        tracing::debug!(
            "Captured {}x{} snapshot ({} bytes)",
            self.width,
            self.height,
            bytes.len()
        );
        Ok(ImageBlob::png(bytes))
    }
}

/// Paint every pixel whose center lies within `width / 2` of the line.
fn stroke_line(image: &mut RgbaImage, line: Line, color: Color, width: f64) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }

    let radius = (width / 2.0).max(0.5);
    let radius_sq = radius * radius;
    let rgba = color.to_rgba8();
    let pixel = Rgba([rgba.r, rgba.g, rgba.b, rgba.a]);

    let min_x = line.p0.x.min(line.p1.x) - radius;
    let max_x = line.p0.x.max(line.p1.x) + radius;
    let min_y = line.p0.y.min(line.p1.y) - radius;
    let max_y = line.p0.y.max(line.p1.y) + radius;

    let Some((x0, x1)) = pixel_span(min_x, max_x, image.width()) else {
        return;
    };
    let Some((y0, y1)) = pixel_span(min_y, max_y, image.height()) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if line.nearest(center, NEAREST_ACCURACY).distance_sq <= radius_sq {
                image.put_pixel(x, y, pixel);
            }
        }
    }
}

/// Clamp a continuous range to pixel indices, `None` if fully outside.
fn pixel_span(min: f64, max: f64, size: u32) -> Option<(u32, u32)> {
    if max < 0.0 || min >= size as f64 {
        return None;
    }
    let lo = min.floor().max(0.0) as u32;
    let hi = (max.ceil() as u32).min(size - 1);
    Some((lo, hi))
}
