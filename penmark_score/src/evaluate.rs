// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sub-scores of a finished drawing.
//!
//! Drawn strokes are paired with template strokes by index. Every sub-score
//! is an integer percentage:
//!
//! - **order**: how many pairs start within `start_tolerance` of the template
//!   start, penalized for missing and extra strokes.
//! - **direction**: agreement of the first-to-last chords of each pair,
//!   remapped from `[-1, 1]` to `[0, 1]`. Zero unless every template stroke
//!   has a comparable drawn stroke.
//! - **shape**: capped distance from each stride-sampled drawn point to the
//!   nearest point of the template centerline, resampled every
//!   `reference_spacing`, averaged.
//! - **start**: distance from the first sample of the drawing to the first
//!   template start, falling off linearly beyond `start_tolerance`.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use penmark_template::{Drawing, PreparedStroke, PreparedTemplate};

use crate::{Error, ScoreConfig};

/// Weight of the shape score in the total.
pub const SHAPE_WEIGHT: f64 = 0.40;
/// Weight of the order score in the total.
pub const ORDER_WEIGHT: f64 = 0.25;
/// Weight of the direction score in the total.
pub const DIRECTION_WEIGHT: f64 = 0.20;
/// Weight of the start score in the total.
pub const START_WEIGHT: f64 = 0.15;

/// Scores of one evaluated drawing, each in `0..=100`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Weighted combination of the four sub-scores.
    pub total: u8,
    /// Closeness of the drawn strokes to the template centerlines.
    pub shape: u8,
    /// Whether strokes were drawn in template order.
    pub order: u8,
    /// Whether strokes were drawn in the template's direction.
    pub direction: u8,
    /// Closeness of the first sample to the first template start.
    pub start: u8,
}

impl ScoreResult {
    /// All scores zero.
    pub const ZERO: Self = Self {
        total: 0,
        shape: 0,
        order: 0,
        direction: 0,
        start: 0,
    };

    /// Combine sub-scores, computing the weighted total.
    pub fn from_parts(shape: u8, order: u8, direction: u8, start: u8) -> Self {
        let total = SHAPE_WEIGHT * f64::from(shape)
            + ORDER_WEIGHT * f64::from(order)
            + DIRECTION_WEIGHT * f64::from(direction)
            + START_WEIGHT * f64::from(start);
        Self {
            total: to_score(total),
            shape,
            order,
            direction,
            start,
        }
    }
}

/// Score `drawing` against `template`.
///
/// A drawing without samples scores [`ScoreResult::ZERO`]. Fails only if
/// `config` does not validate.
pub fn evaluate(
    template: &PreparedTemplate,
    drawing: &Drawing,
    config: &ScoreConfig,
) -> Result<ScoreResult, Error> {
    config.validate()?;
    let strokes = template.strokes();
    if drawing.is_empty() || strokes.is_empty() {
        return Ok(ScoreResult::ZERO);
    }
    let drawn: Vec<Vec<Point>> = drawing
        .strokes
        .iter()
        .map(|s| s.locations().collect())
        .collect();

    let result = ScoreResult::from_parts(
        shape_score(strokes, &drawn, config),
        order_score(strokes, &drawn, config.start_tolerance),
        direction_score(strokes, &drawn),
        start_score(template, drawing, config.start_tolerance),
    );
    log::debug!("scored {} drawn strokes: {result:?}", drawn.len());
    Ok(result)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is rounded and clamped to 0..=100 first."
)]
fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Stroke counts are far below 2^52."
)]
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        0
    } else {
        to_score(100.0 * part as f64 / whole as f64)
    }
}

fn order_score(template: &[PreparedStroke], drawn: &[Vec<Point>], tolerance: f64) -> u8 {
    let expected = template.len();
    let matched = template
        .iter()
        .zip(drawn)
        .filter(|(t, d)| d.first().is_some_and(|p| p.distance(t.start) <= tolerance))
        .count();
    let extra = drawn.len().saturating_sub(expected);
    let penalty = (expected - matched) + extra;
    percent(expected.saturating_sub(penalty), expected)
}

/// Unit vector from the first to the last point, if they differ.
fn chord(points: &[Point]) -> Option<Vec2> {
    let v = *points.last()? - *points.first()?;
    let length = v.hypot();
    (length > 0.0).then(|| v / length)
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Stroke counts are far below 2^52."
)]
fn direction_score(template: &[PreparedStroke], drawn: &[Vec<Point>]) -> u8 {
    let mut sum = 0.0;
    let mut valid = 0_usize;
    for (t, d) in template.iter().zip(drawn) {
        let (Some(expected), Some(actual)) = (chord(&t.points), chord(d)) else {
            continue;
        };
        sum += (expected.dot(actual).clamp(-1.0, 1.0) + 1.0) / 2.0;
        valid += 1;
    }
    if valid == 0 || valid < template.len() {
        return 0;
    }
    to_score(100.0 * sum / valid as f64)
}

/// Every `stride`-th point, plus the last one.
fn stride_sample(points: &[Point], stride: usize) -> impl Iterator<Item = Point> + '_ {
    let tail = points
        .len()
        .checked_sub(1)
        .filter(|last| last % stride != 0)
        .map(|last| points[last]);
    points.iter().copied().step_by(stride).chain(tail)
}

/// The polyline with every edge split into equal pieces no longer than
/// `spacing`. Vertices are kept.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Piece counts are small positive integers."
)]
fn resample(points: &[Point], spacing: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let mut out = alloc::vec![first];
    for edge in points.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        let pieces = (a.distance(b) / spacing).ceil() as usize;
        out.extend((1..=pieces).map(|i| a.lerp(b, i as f64 / pieces as f64)));
    }
    out
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Sample counts are far below 2^52."
)]
fn shape_score(template: &[PreparedStroke], drawn: &[Vec<Point>], config: &ScoreConfig) -> u8 {
    let stride = config.sample_stride.max(1);
    let cap = 2.0 * config.deviation_tolerance;
    let mut sum = 0.0;
    let mut count = 0_usize;
    for (t, d) in template.iter().zip(drawn) {
        let reference = resample(&t.points, config.reference_spacing);
        for p in stride_sample(d, stride) {
            let nearest = reference
                .iter()
                .map(|q| q.distance(p))
                .fold(f64::INFINITY, f64::min);
            sum += nearest.min(cap);
            count += 1;
        }
    }
    if count == 0 {
        return 0;
    }
    let average = sum / count as f64;
    log::trace!("shape: {count} samples, average distance {average:.2}");
    to_score(100.0 - (100.0 * average / config.deviation_tolerance).round())
}

fn start_score(template: &PreparedTemplate, drawing: &Drawing, tolerance: f64) -> u8 {
    let (Some(first), Some(target)) = (drawing.first_location(), template.first_start()) else {
        return 0;
    };
    let distance = first.distance(target);
    if distance <= tolerance {
        100
    } else {
        to_score(100.0 - (distance - tolerance).round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Affine;
    use penmark_template::{DrawnStroke, Metrics, RowLayout, Template, TemplateStroke};

    fn letter_t() -> PreparedTemplate {
        let template = Template::new(
            vec![
                TemplateStroke::new(
                    "stem",
                    0,
                    vec![Point::new(0.0, 200.0), Point::new(0.0, 100.0), Point::new(0.0, 0.0)],
                ),
                TemplateStroke::new(
                    "bar",
                    1,
                    vec![Point::new(-60.0, 120.0), Point::new(0.0, 120.0), Point::new(60.0, 120.0)],
                ),
            ],
            Metrics {
                ascender: 200.0,
                x_height: 100.0,
            },
        );
        PreparedTemplate::prepare(&template, RowLayout::new(400.0, 200.0, 60.0)).unwrap()
    }

    fn copy_of(strokes: &[PreparedStroke], transform: Affine) -> Drawing {
        let mut drawing = Drawing::new();
        let mut created_at = 0.0;
        for stroke in strokes {
            drawing.push(
                DrawnStroke::from_points(created_at, 0.05, stroke.points.iter().copied())
                    .with_transform(transform),
            );
            created_at += 1.0;
        }
        drawing
    }

    #[test]
    fn empty_drawing_scores_zero() {
        let template = letter_t();
        let config = ScoreConfig::default();
        assert_eq!(evaluate(&template, &Drawing::new(), &config).unwrap(), ScoreResult::ZERO);

        let blank = Drawing::from_strokes(vec![DrawnStroke::new(0.0), DrawnStroke::new(1.0)]);
        assert_eq!(evaluate(&template, &blank, &config).unwrap(), ScoreResult::ZERO);
    }

    #[test]
    fn exact_copy_scores_full_marks() {
        let template = letter_t();
        let drawing = copy_of(template.strokes(), Affine::IDENTITY);
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert_eq!(
            result,
            ScoreResult {
                total: 100,
                shape: 100,
                order: 100,
                direction: 100,
                start: 100,
            }
        );
    }

    #[test]
    fn scoring_is_idempotent() {
        let template = letter_t();
        let drawing = copy_of(template.strokes(), Affine::translate((7.0, -3.0)));
        let config = ScoreConfig::default();
        let first = evaluate(&template, &drawing, &config).unwrap();
        let second = evaluate(&template, &drawing, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_start_out_of_place_zeroes_order() {
        let template = letter_t();
        let drawing = copy_of(template.strokes(), Affine::translate((200.0, 0.0)));
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert_eq!(result.order, 0);
        assert_eq!(result.start, 0);
        assert_eq!(result.shape, 0, "distances are capped, not unbounded");
        assert_eq!(result.direction, 100, "translation keeps direction");
        assert_eq!(result.total, 20);
    }

    #[test]
    fn extra_strokes_are_penalized() {
        let template = letter_t();
        let mut drawing = copy_of(template.strokes(), Affine::IDENTITY);
        drawing.push(DrawnStroke::from_points(
            5.0,
            0.05,
            [Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
        ));
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert_eq!(result.order, 50);
        assert_eq!(result.shape, 100);
        assert_eq!(result.direction, 100);
        assert_eq!(result.total, 88);
    }

    #[test]
    fn missing_strokes_zero_direction() {
        let template = letter_t();
        let drawing = copy_of(&template.strokes()[..1], Affine::IDENTITY);
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert_eq!(result.direction, 0);
        assert_eq!(result.order, 50);
        assert_eq!(result.shape, 100);
        assert_eq!(result.start, 100);
        assert_eq!(result.total, 68);
    }

    #[test]
    fn reversed_stroke_halves_direction() {
        let template = letter_t();
        let mut strokes = template.strokes().to_vec();
        strokes[0].points.reverse();
        let drawing = copy_of(&strokes, Affine::IDENTITY);
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert_eq!(result.direction, 50);
        assert_eq!(result.order, 50);
        assert_eq!(result.start, 0);
        assert_eq!(result.shape, 100);
    }

    #[test]
    fn shape_falls_off_with_distance() {
        let template = letter_t();
        let mut drawing = copy_of(template.strokes(), Affine::IDENTITY);
        drawing.strokes[0].transform = Affine::translate((10.0, 0.0));
        let config = ScoreConfig {
            sample_stride: 1,
            ..ScoreConfig::default()
        };
        let result = evaluate(&template, &drawing, &config).unwrap();
        // Three stem samples 10 away, three bar samples on the line.
        assert_eq!(result.shape, 75);
        assert_eq!(result.order, 100);
    }

    #[test]
    fn dense_trace_of_a_sparse_stroke_keeps_its_shape() {
        let stem = Template::new(
            vec![TemplateStroke::new(
                "stem",
                0,
                vec![Point::new(0.0, 200.0), Point::new(0.0, 0.0)],
            )],
            Metrics {
                ascender: 200.0,
                x_height: 100.0,
            },
        );
        let template =
            PreparedTemplate::prepare(&stem, RowLayout::new(400.0, 200.0, 60.0)).unwrap();
        let top = template.strokes()[0].points[0];
        let trace = (0..=40).map(|i| top + Vec2::new(0.0, f64::from(i) * 5.0));
        let drawing = Drawing::from_strokes(vec![DrawnStroke::from_points(0.0, 0.02, trace)]);
        let result = evaluate(&template, &drawing, &ScoreConfig::default()).unwrap();
        assert!(result.shape >= 90, "{result:?}");
        assert_eq!(result.total, 100);
    }

    #[test]
    fn zero_deviation_tolerance_is_an_error() {
        let template = letter_t();
        let drawing = copy_of(template.strokes(), Affine::IDENTITY);
        let config = ScoreConfig {
            deviation_tolerance: 0.0,
            ..ScoreConfig::default()
        };
        assert_eq!(
            evaluate(&template, &drawing, &config),
            Err(Error::InvalidDeviationTolerance(0.0))
        );
    }

    #[test]
    fn resampling_bounds_the_gap_and_keeps_vertices() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 3.0)];
        let out = resample(&points, 4.0);
        assert_eq!(out.len(), 5, "{out:?}");
        assert_eq!(out[0], points[0]);
        assert_eq!(out[3], points[1]);
        assert_eq!(out[4], points[2]);
        assert!(out.windows(2).all(|w| w[0].distance(w[1]) <= 4.0));
        assert!(resample(&[], 4.0).is_empty());
    }

    #[test]
    fn stride_sampling_keeps_the_last_point() {
        let points: Vec<Point> = (0..6).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let xs: Vec<f64> = stride_sample(&points, 4).map(|p| p.x).collect();
        assert_eq!(xs, [0.0, 4.0, 5.0]);
        let xs: Vec<f64> = stride_sample(&points[..5], 4).map(|p| p.x).collect();
        assert_eq!(xs, [0.0, 4.0]);
        assert_eq!(stride_sample(&[], 4).count(), 0);
    }
}
