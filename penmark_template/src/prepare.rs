// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a template into a practice row.
//!
//! [`PreparedTemplate::prepare`] maps template units (y up, baseline at 0) into
//! canvas units (y down) for a given [`RowLayout`]: strokes are sorted by
//! order, uniformly scaled so the template ascender matches the row ascender,
//! centered horizontally, and optionally mirrored for left-handed practice.
//! The result is cached by the caller and rebuilt only when
//! [`PreparedTemplate::needs_rebuild`] says so.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect};

use crate::{Error, Template};

/// Width changes at or below this many canvas units do not trigger a rebuild.
pub const WIDTH_EPSILON: f64 = 1.0;

/// Default horizontal padding on each side of a practice row.
pub const DEFAULT_HORIZONTAL_PADDING: f64 = 16.0;

/// Which hand the learner writes with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handedness {
    /// Geometry is used as authored.
    #[default]
    Right,
    /// Geometry is mirrored horizontally around the letter's bounds.
    Left,
}

impl Handedness {
    /// The other hand.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

/// Geometry of the practice row a template is fitted into.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowLayout {
    /// Total width available for the row.
    pub available_width: f64,
    /// Distance from the top of the row to the baseline.
    pub ascender_height: f64,
    /// Distance from the baseline to the bottom of the row.
    pub descender_height: f64,
    /// Padding reserved on the left and on the right.
    pub horizontal_padding: f64,
    /// Learner handedness.
    pub handedness: Handedness,
}

impl RowLayout {
    /// A right-handed layout with the default padding.
    pub fn new(available_width: f64, ascender_height: f64, descender_height: f64) -> Self {
        Self {
            available_width,
            ascender_height,
            descender_height,
            horizontal_padding: DEFAULT_HORIZONTAL_PADDING,
            handedness: Handedness::Right,
        }
    }

    /// Set the learner handedness.
    #[must_use]
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Set the horizontal padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.horizontal_padding = padding;
        self
    }

    /// Full height of the row.
    pub fn row_height(&self) -> f64 {
        self.ascender_height + self.descender_height
    }
}

/// A template stroke mapped into canvas units.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedStroke {
    /// Identifier copied from the template stroke.
    pub id: String,
    /// Drawing order copied from the template stroke.
    pub order: u32,
    /// Centerline in canvas units. Never empty.
    pub points: Vec<Point>,
    /// Declared start in canvas units.
    pub start: Point,
    /// Declared end in canvas units.
    pub end: Point,
}

impl PreparedStroke {
    fn apply(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
        self.start = affine * self.start;
        self.end = affine * self.end;
    }
}

/// A template fitted into a specific [`RowLayout`].
///
/// Immutable once built; strokes are stored sorted by `order`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedTemplate {
    strokes: Vec<PreparedStroke>,
    layout: RowLayout,
    scale: f64,
    x_height_line: f64,
    bounds: Rect,
}

impl PreparedTemplate {
    /// Fit `template` into `layout`.
    pub fn prepare(template: &Template, layout: RowLayout) -> Result<Self, Error> {
        template.validate()?;
        let row = layout.ascender_height;
        if !(row.is_finite() && row > 0.0) {
            return Err(Error::InvalidRowHeight(row));
        }
        let scale = row / template.metrics.ascender;
        let ordered = template.ordered_strokes();

        let (min_x, max_x) = ordered
            .iter()
            .flat_map(|s| s.points.iter().copied().chain(s.start).chain(s.end))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let letter_width = (max_x - min_x) * scale;
        let inner_width = layout.available_width - 2.0 * layout.horizontal_padding;
        let left = layout.horizontal_padding + (inner_width - letter_width) / 2.0;
        let baseline = layout.ascender_height;

        // Template y grows upwards from the baseline; canvas y grows downwards.
        let to_canvas = Affine::new([scale, 0.0, 0.0, -scale, left - min_x * scale, baseline]);

        let mut strokes = Vec::with_capacity(ordered.len());
        for stroke in ordered {
            let (Some(start), Some(end)) = (stroke.start_point(), stroke.end_point()) else {
                return Err(Error::EmptyStroke {
                    id: stroke.id.clone(),
                });
            };
            strokes.push(PreparedStroke {
                id: stroke.id.clone(),
                order: stroke.order,
                points: stroke.points.iter().map(|p| to_canvas * *p).collect(),
                start: to_canvas * start,
                end: to_canvas * end,
            });
        }

        let (min_y, max_y) = strokes
            .iter()
            .flat_map(|s| s.points.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let bounds = Rect::new(left, min_y, left + letter_width, max_y);

        let mut prepared = Self {
            strokes,
            layout: RowLayout {
                handedness: Handedness::Right,
                ..layout
            },
            scale,
            x_height_line: baseline - template.metrics.x_height * scale,
            bounds,
        };
        if layout.handedness == Handedness::Left {
            prepared = prepared.mirrored();
        }
        log::debug!(
            "prepared {} strokes at scale {:.3} for width {:.1} ({:?})",
            prepared.strokes.len(),
            scale,
            layout.available_width,
            layout.handedness
        );
        Ok(prepared)
    }

    /// Mirror horizontally around the letter's own bounds and toggle the
    /// recorded handedness.
    ///
    /// Points, declared starts and declared ends all receive the same
    /// transform, so mirroring twice restores the original geometry.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let axis = self.bounds.x0 + self.bounds.x1;
        let flip = Affine::new([-1.0, 0.0, 0.0, 1.0, axis, 0.0]);
        let mut mirrored = self.clone();
        for stroke in &mut mirrored.strokes {
            stroke.apply(flip);
        }
        mirrored.layout.handedness = self.layout.handedness.toggled();
        mirrored
    }

    /// Whether geometry prepared for this template must be rebuilt for `layout`.
    ///
    /// Width jitter up to [`WIDTH_EPSILON`] is ignored to avoid churn while a
    /// host view settles.
    pub fn needs_rebuild(&self, layout: &RowLayout) -> bool {
        let current = &self.layout;
        (current.available_width - layout.available_width).abs() > WIDTH_EPSILON
            || current.handedness != layout.handedness
            || current.ascender_height != layout.ascender_height
            || current.descender_height != layout.descender_height
            || current.horizontal_padding != layout.horizontal_padding
    }

    /// Strokes sorted by ascending order.
    pub fn strokes(&self) -> &[PreparedStroke] {
        &self.strokes
    }

    /// The layout this template was prepared for.
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Uniform scale from template units to canvas units.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Canvas y of the baseline.
    pub fn baseline(&self) -> f64 {
        self.layout.ascender_height
    }

    /// Canvas y of the x-height guide.
    pub fn x_height_line(&self) -> f64 {
        self.x_height_line
    }

    /// Bounds of the letter in canvas units.
    ///
    /// Horizontally this spans every point including declared starts and ends.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Declared start of the first stroke.
    pub fn first_start(&self) -> Option<Point> {
        self.strokes.first().map(|s| s.start)
    }
}
