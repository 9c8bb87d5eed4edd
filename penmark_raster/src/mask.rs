// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-channel ink masks over a fixed canvas.

use kurbo::{Point, Rect};
use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, PathBuilder, Stroke, Transform};

use crate::Error;

/// Maps canvas units onto a pixel grid covering `bounds`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Canvas {
    origin: Point,
    scale: f64,
    width: u32,
    height: u32,
}

impl Canvas {
    /// A grid of `ceil(bounds · scale)` pixels, at least 1×1.
    pub(crate) fn new(bounds: Rect, scale: f64) -> Result<Self, Error> {
        let width = pixels(bounds.width() * scale)?;
        let height = pixels(bounds.height() * scale)?;
        Ok(Self {
            origin: bounds.origin(),
            scale,
            width,
            height,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    /// A blank mask the size of the grid.
    pub(crate) fn mask(&self) -> Result<Mask, Error> {
        Mask::new(self.width, self.height).ok_or(Error::CanvasTooLarge {
            width: self.width,
            height: self.height,
        })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Pixel coordinates fit comfortably in f32."
    )]
    fn to_pixel(&self, p: Point) -> (f32, f32) {
        (
            ((p.x - self.origin.x) * self.scale) as f32,
            ((p.y - self.origin.y) * self.scale) as f32,
        )
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Line widths fit comfortably in f32."
    )]
    fn to_pixel_length(&self, length: f64) -> f32 {
        (length * self.scale) as f32
    }

    /// Stroke a polyline with round caps and joins.
    ///
    /// A polyline without a second point is drawn as a dot.
    pub(crate) fn stroke_polyline(&self, mask: &mut Mask, points: &[Point], width: f64) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            self.stamp_dot(mask, *first, width);
            return;
        }
        let mut pb = PathBuilder::new();
        let (x, y) = self.to_pixel(*first);
        pb.move_to(x, y);
        for p in rest {
            let (x, y) = self.to_pixel(*p);
            pb.line_to(x, y);
        }
        let stroke = Stroke {
            width: self.to_pixel_length(width),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        if let Some(outline) = pb.finish().and_then(|path| path.stroke(&stroke, 1.0)) {
            fill(mask, &outline);
        }
    }

    /// Fill a circle of `diameter` centered on `center`.
    pub(crate) fn stamp_dot(&self, mask: &mut Mask, center: Point, diameter: f64) {
        let (x, y) = self.to_pixel(center);
        if let Some(circle) = PathBuilder::from_circle(x, y, self.to_pixel_length(diameter) / 2.0) {
            fill(mask, &circle);
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is a finite, positive whole number below u32::MAX."
)]
fn pixels(extent: f64) -> Result<u32, Error> {
    let size = extent.ceil().max(1.0);
    if !(size.is_finite() && size <= f64::from(u32::MAX)) {
        return Err(Error::InvalidExtent(extent));
    }
    Ok(size as u32)
}

fn fill(mask: &mut Mask, path: &Path) {
    mask.fill_path(path, FillRule::Winding, false, Transform::identity());
}

/// Number of lit pixels.
pub(crate) fn count_lit(mask: &Mask) -> usize {
    mask.data().iter().filter(|&&v| v > 0).count()
}

/// Number of pixels lit in both masks.
pub(crate) fn count_overlap(a: &Mask, b: &Mask) -> usize {
    a.data()
        .iter()
        .zip(b.data())
        .filter(|&(&x, &y)| x > 0 && y > 0)
        .count()
}
