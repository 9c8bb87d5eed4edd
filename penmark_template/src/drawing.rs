// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate drawings and their flattened, time-ordered sample stream.

use alloc::vec::Vec;

use kurbo::{Affine, Point};

/// A raw pen sample, relative to its stroke's creation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedPoint {
    /// Raw location, before the stroke transform.
    pub point: Point,
    /// Seconds since the stroke was created.
    pub time_offset: f64,
}

/// One continuous pen motion of a candidate drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnStroke {
    /// Raw samples in capture order.
    pub points: Vec<TimedPoint>,
    /// Creation time of the stroke, in seconds.
    pub created_at: f64,
    /// Transform from raw sample space into canvas units.
    pub transform: Affine,
}

impl DrawnStroke {
    /// An empty stroke created at `created_at`.
    pub fn new(created_at: f64) -> Self {
        Self {
            points: Vec::new(),
            created_at,
            transform: Affine::IDENTITY,
        }
    }

    /// A stroke with one sample every `interval` seconds.
    pub fn from_points(
        created_at: f64,
        interval: f64,
        points: impl IntoIterator<Item = Point>,
    ) -> Self {
        let mut stroke = Self::new(created_at);
        for (i, point) in points.into_iter().enumerate() {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Sample counts are far below 2^52."
            )]
            stroke.push(point, i as f64 * interval);
        }
        stroke
    }

    /// Set the raw-to-canvas transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Append a raw sample.
    pub fn push(&mut self, point: Point, time_offset: f64) {
        self.points.push(TimedPoint { point, time_offset });
    }

    /// Whether the stroke has no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample locations in canvas units.
    pub fn locations(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(|p| self.transform * p.point)
    }

    /// First location in canvas units.
    pub fn first(&self) -> Option<Point> {
        self.points.first().map(|p| self.transform * p.point)
    }

    /// Last location in canvas units.
    pub fn last(&self) -> Option<Point> {
        self.points.last().map(|p| self.transform * p.point)
    }
}

/// A flattened sample: canvas location, absolute timestamp and source stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Location in canvas units.
    pub location: Point,
    /// Absolute time in seconds (`created_at + time_offset`).
    pub timestamp: f64,
    /// Index of the drawn stroke this sample came from.
    pub stroke: usize,
}

/// A learner's drawing: strokes in the order they were captured.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Drawing {
    /// Drawn strokes.
    pub strokes: Vec<DrawnStroke>,
}

impl Drawing {
    /// An empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A drawing from existing strokes.
    pub fn from_strokes(strokes: Vec<DrawnStroke>) -> Self {
        Self { strokes }
    }

    /// Append a stroke.
    pub fn push(&mut self, stroke: DrawnStroke) {
        self.strokes.push(stroke);
    }

    /// Whether no stroke has any sample.
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(DrawnStroke::is_empty)
    }

    /// Location of the very first sample of the drawing.
    pub fn first_location(&self) -> Option<Point> {
        self.strokes.iter().find_map(DrawnStroke::first)
    }

    /// Flatten every stroke into one time-ordered sample list.
    ///
    /// Strokes are visited by creation time, then samples are stably sorted by
    /// absolute timestamp, so ties keep stroke creation order and capture order.
    pub fn samples(&self) -> Vec<Sample> {
        let mut order: Vec<usize> = (0..self.strokes.len()).collect();
        order.sort_by(|&a, &b| {
            self.strokes[a]
                .created_at
                .total_cmp(&self.strokes[b].created_at)
        });

        let mut samples = Vec::with_capacity(self.strokes.iter().map(|s| s.points.len()).sum());
        for index in order {
            let stroke = &self.strokes[index];
            samples.extend(stroke.points.iter().map(|p| Sample {
                location: stroke.transform * p.point,
                timestamp: stroke.created_at + p.time_offset,
                stroke: index,
            }));
        }
        samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Vec2;

    #[test]
    fn samples_merge_by_absolute_time() {
        // Second stroke was created first and overlaps the first in time.
        let a = DrawnStroke::from_points(1.0, 0.5, [Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let b = DrawnStroke::from_points(0.75, 0.5, [Point::new(5.0, 5.0), Point::new(6.0, 5.0)]);
        let drawing = Drawing::from_strokes(vec![a, b]);
        let samples = drawing.samples();
        let order: Vec<(usize, f64)> = samples.iter().map(|s| (s.stroke, s.timestamp)).collect();
        assert_eq!(order, [(1, 0.75), (0, 1.0), (1, 1.25), (0, 1.5)]);
    }

    #[test]
    fn ties_keep_creation_order() {
        let a = DrawnStroke::from_points(2.0, 0.0, [Point::new(0.0, 0.0)]);
        let b = DrawnStroke::from_points(1.0, 1.0, [Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
        let samples = Drawing::from_strokes(vec![a, b]).samples();
        let strokes: Vec<usize> = samples.iter().map(|s| s.stroke).collect();
        assert_eq!(strokes, [1, 1, 0]);
    }

    #[test]
    fn transform_applies_to_locations() {
        let stroke = DrawnStroke::from_points(0.0, 0.1, [Point::new(1.0, 2.0)])
            .with_transform(Affine::translate(Vec2::new(10.0, 20.0)));
        assert_eq!(stroke.first(), Some(Point::new(11.0, 22.0)));
        let drawing = Drawing::from_strokes(vec![stroke]);
        assert_eq!(drawing.samples()[0].location, Point::new(11.0, 22.0));
        assert_eq!(drawing.first_location(), Some(Point::new(11.0, 22.0)));
    }

    #[test]
    fn empty_drawing() {
        let mut drawing = Drawing::new();
        assert!(drawing.is_empty());
        drawing.push(DrawnStroke::new(0.0));
        assert!(drawing.is_empty());
        assert!(drawing.samples().is_empty());
        assert_eq!(drawing.first_location(), None);
    }
}
