// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The template contract: reference strokes in font-like units plus metrics.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

use crate::Error;

/// Vertical metrics of a letter template, in template units.
///
/// Only used to derive the scale that fits the letter into a practice row.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Height of the ascender line above the baseline.
    pub ascender: f64,
    /// Height of the x-height line above the baseline.
    pub x_height: f64,
}

/// One reference stroke of a template.
///
/// Points are in template units with `y` growing upwards from the baseline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateStroke {
    /// Stable identifier, unique within the template.
    pub id: String,
    /// Position in the required drawing sequence (0-based).
    pub order: u32,
    /// Centerline of the stroke. Must not be empty.
    pub points: Vec<Point>,
    /// Explicit start point, overriding the first point.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<Point>,
    /// Explicit end point, overriding the last point.
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: Option<Point>,
}

impl TemplateStroke {
    /// Create a stroke whose start and end are its first and last points.
    pub fn new(id: impl Into<String>, order: u32, points: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            order,
            points,
            start: None,
            end: None,
        }
    }

    /// Override the declared start point.
    #[must_use]
    pub fn with_start(mut self, start: Point) -> Self {
        self.start = Some(start);
        self
    }

    /// Override the declared end point.
    #[must_use]
    pub fn with_end(mut self, end: Point) -> Self {
        self.end = Some(end);
        self
    }

    /// Declared start: the explicit override, else the first point.
    pub fn start_point(&self) -> Option<Point> {
        self.start.or_else(|| self.points.first().copied())
    }

    /// Declared end: the explicit override, else the last point.
    pub fn end_point(&self) -> Option<Point> {
        self.end.or_else(|| self.points.last().copied())
    }
}

/// A reference letterform: ordered strokes plus metrics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    /// Strokes in any storage order; `order` defines the drawing sequence.
    pub strokes: Vec<TemplateStroke>,
    /// Vertical metrics used for scaling.
    pub metrics: Metrics,
}

impl Template {
    /// Create a template from strokes and metrics.
    pub fn new(strokes: Vec<TemplateStroke>, metrics: Metrics) -> Self {
        Self { strokes, metrics }
    }

    /// Check the template contract.
    ///
    /// A valid template has at least one stroke, every stroke has at least one
    /// point, `order` values are unique, and the ascender is positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.strokes.is_empty() {
            return Err(Error::EmptyTemplate);
        }
        let ascender = self.metrics.ascender;
        if !(ascender.is_finite() && ascender > 0.0) {
            return Err(Error::InvalidAscender(ascender));
        }
        if let Some(stroke) = self.strokes.iter().find(|s| s.points.is_empty()) {
            return Err(Error::EmptyStroke {
                id: stroke.id.clone(),
            });
        }
        let mut orders: Vec<u32> = self.strokes.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        if let Some(pair) = orders.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::DuplicateOrder { order: pair[0] });
        }
        Ok(())
    }

    /// Strokes sorted by ascending `order`.
    pub fn ordered_strokes(&self) -> Vec<&TemplateStroke> {
        let mut strokes: Vec<&TemplateStroke> = self.strokes.iter().collect();
        strokes.sort_by_key(|s| s.order);
        strokes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn metrics() -> Metrics {
        Metrics {
            ascender: 100.0,
            x_height: 50.0,
        }
    }

    #[test]
    fn start_and_end_fall_back_to_points() {
        let stroke = TemplateStroke::new("a", 0, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(stroke.start_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(stroke.end_point(), Some(Point::new(3.0, 4.0)));

        let stroke = stroke.with_start(Point::new(0.0, 0.0));
        assert_eq!(stroke.start_point(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn rejects_empty_template() {
        let template = Template::new(vec![], metrics());
        assert_eq!(template.validate(), Err(Error::EmptyTemplate));
    }

    #[test]
    fn rejects_duplicate_order() {
        let template = Template::new(
            vec![
                TemplateStroke::new("a", 1, vec![Point::ZERO]),
                TemplateStroke::new("b", 1, vec![Point::ZERO]),
            ],
            metrics(),
        );
        assert_eq!(template.validate(), Err(Error::DuplicateOrder { order: 1 }));
    }

    #[test]
    fn rejects_empty_stroke_and_bad_ascender() {
        let template = Template::new(vec![TemplateStroke::new("a", 0, vec![])], metrics());
        assert_eq!(
            template.validate(),
            Err(Error::EmptyStroke { id: "a".into() })
        );

        let template = Template::new(
            vec![TemplateStroke::new("a", 0, vec![Point::ZERO])],
            Metrics {
                ascender: 0.0,
                x_height: 0.0,
            },
        );
        assert_eq!(template.validate(), Err(Error::InvalidAscender(0.0)));
    }

    #[test]
    fn ordered_strokes_sort_by_order() {
        let template = Template::new(
            vec![
                TemplateStroke::new("second", 1, vec![Point::ZERO]),
                TemplateStroke::new("first", 0, vec![Point::ZERO]),
            ],
            metrics(),
        );
        let ids: Vec<&str> = template
            .ordered_strokes()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["first", "second"]);
    }
}
