// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use penmark_template::{Drawing, PreparedStroke, PreparedTemplate, Sample};

use crate::mask::{Canvas, count_lit, count_overlap};
use crate::zones::{self, ZoneHits, ZoneReport};
use crate::{Error, RasterConfig};

/// Why a raster validation failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RasterFailure {
    /// A stroke the learner attempted never entered its start zone.
    MissedStart {
        /// Template stroke index.
        stroke: usize,
    },
    /// The next stroke was started before this one reached its end zone.
    MissedEnd {
        /// Template stroke index.
        stroke: usize,
    },
    /// Every end zone was reached but too little template ink was covered.
    InsufficientCoverage,
}

/// Outcome of a raster validation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterReport {
    /// `covered_pixels / template_pixels`, or 0 without template ink.
    pub coverage_ratio: f64,
    /// Pixels lit by the template tube.
    pub template_pixels: usize,
    /// Template pixels also lit by student ink.
    pub covered_pixels: usize,
    /// Zone tracking per template stroke, in drawing order.
    pub zones: Vec<ZoneReport>,
    /// The failure, if any.
    pub failure: Option<RasterFailure>,
}

impl RasterReport {
    /// Whether no failure was found.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Rasterize `template` and `drawing` and compare their ink.
///
/// Template centerlines are stroked with the tube width into one mask; each
/// drawn stroke gets a dot at its first sample plus a polyline through its
/// samples in a second mask. Both masks cover the template bounds, inflated by
/// half the widest line, at `raster_scale` pixels per canvas unit.
pub fn validate(
    template: &PreparedTemplate,
    drawing: &Drawing,
    config: &RasterConfig,
) -> Result<RasterReport, Error> {
    config.validate()?;
    let strokes = template.strokes();
    let pad = config.tube_line_width.max(config.student_line_width) / 2.0;
    let canvas = Canvas::new(ink_bounds(strokes).inflate(pad, pad), config.raster_scale)?;

    let mut template_ink = canvas.mask()?;
    for stroke in strokes {
        canvas.stroke_polyline(&mut template_ink, &stroke.points, config.tube_line_width);
    }

    let samples = drawing.samples();
    let mut student_ink = canvas.mask()?;
    for points in by_source(&samples, drawing.strokes.len()) {
        if let Some(&first) = points.first() {
            canvas.stamp_dot(&mut student_ink, first, config.student_line_width);
        }
        canvas.stroke_polyline(&mut student_ink, &points, config.student_line_width);
    }

    let template_pixels = count_lit(&template_ink);
    let covered_pixels = count_overlap(&template_ink, &student_ink);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Pixel counts are far below 2^52."
    )]
    let coverage_ratio = if template_pixels == 0 {
        0.0
    } else {
        covered_pixels as f64 / template_pixels as f64
    };

    let hits = zones::track(strokes, &samples, config.start_radius, config.end_radius);
    let zones: Vec<ZoneReport> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| ZoneReport {
            attempted: drawing.strokes.get(i).is_some_and(|s| !s.is_empty()),
            started_at: hit.start.map(|at| samples[at].timestamp),
            ended_at: hit.end.map(|at| samples[at].timestamp),
        })
        .collect();
    let failure = judge(&hits, &zones, coverage_ratio, config.coverage_threshold);

    log::debug!(
        "raster {}x{}: {covered_pixels}/{template_pixels} pixels covered, failure {failure:?}",
        canvas.width(),
        canvas.height()
    );
    Ok(RasterReport {
        coverage_ratio,
        template_pixels,
        covered_pixels,
        zones,
        failure,
    })
}

fn ink_bounds(strokes: &[PreparedStroke]) -> Rect {
    strokes
        .iter()
        .flat_map(|s| s.points.iter().copied())
        .fold(None, |acc: Option<Rect>, p| {
            Some(acc.map_or(Rect::from_points(p, p), |r| r.union_pt(p)))
        })
        .unwrap_or_default()
}

/// Sample locations grouped by source stroke, each group in time order.
fn by_source(samples: &[Sample], sources: usize) -> Vec<Vec<Point>> {
    let mut groups = vec![Vec::new(); sources];
    for sample in samples {
        if let Some(group) = groups.get_mut(sample.stroke) {
            group.push(sample.location);
        }
    }
    groups
}

fn judge(
    hits: &[ZoneHits],
    zones: &[ZoneReport],
    coverage_ratio: f64,
    threshold: f64,
) -> Option<RasterFailure> {
    if let Some(stroke) = zones
        .iter()
        .position(|z| z.attempted && z.started_at.is_none())
    {
        return Some(RasterFailure::MissedStart { stroke });
    }
    for (stroke, pair) in hits.windows(2).enumerate() {
        if let (Some(_), Some(next_start)) = (pair[0].start, pair[1].start) {
            if pair[0].end.is_none_or(|end| next_start < end) {
                return Some(RasterFailure::MissedEnd { stroke });
            }
        }
    }
    let all_ended = hits.iter().all(|h| h.end.is_some());
    (all_ended && coverage_ratio < threshold).then_some(RasterFailure::InsufficientCoverage)
}
