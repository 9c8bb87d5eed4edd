// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-sample trace state machine.
//!
//! Strokes are visited strictly in order. For the current stroke the analyzer
//! is either [`TracePhase::Waiting`] for a sample inside the start circle, or
//! [`TracePhase::Inside`], classifying every sample against the corridor until
//! one lands in the end circle.
//!
//! ## Transitions
//!
//! 1. **Waiting → Inside**: a sample within the start circle. Runtime counters
//!    reset and the entering sample is tracked as the first one.
//! 2. **Inside**: the projection distance classifies the sample as inside
//!    (`≤ corridor_radius`), outside (`≤ soft_limit`, raising a deviation
//!    warning) or a terminal [`FailureReason::LeftCorridor`]. The furthest arc
//!    length reached only grows, and waypoints at or below it (plus a small
//!    tolerance) are marked hit.
//! 3. **Inside → next stroke**: a sample within the end circle, once the pen
//!    has left the start circle or travelled the whole centerline. When the
//!    pen arrives there along the centerline (its furthest arc reached the
//!    point where the centerline enters the end circle), the rest of the
//!    stroke counts as travelled and its waypoints as hit. Missing
//!    waypoints fail with [`FailureReason::MissedWaypoint`]; too few inside
//!    samples or too little travel fail with
//!    [`FailureReason::InsufficientCoverage`]; otherwise the stroke completes.
//! 4. **Waiting, skipping ahead**: a sample within the *next* stroke's start
//!    circle while the current one was never entered is a
//!    [`FailureReason::MissedStart`].
//!
//! After a terminal failure every further sample is ignored.

use alloc::vec::Vec;

use kurbo::Point;
use penmark_template::{Sample, StrokeSegment};
use smallvec::SmallVec;

use crate::{
    Failure, FailureReason, StrokeReport, TraceConfig, TracePhase, TraceResult, Warning,
    WarningKind,
};

/// Slack, in canvas units, when comparing waypoint arc lengths to progress.
pub const WAYPOINT_TOLERANCE: f64 = 0.5;

/// At finalization, an awaited stroke counts as approached when the closest
/// sample came within this multiple of the start radius.
pub const START_APPROACH_FACTOR: f64 = 1.3;

/// Counters for the stroke currently being drawn.
#[derive(Clone, Debug, Default)]
struct Runtime {
    entered_at: f64,
    last_at: f64,
    inside: usize,
    outside: usize,
    total: usize,
    max_arc: f64,
    max_deviation: f64,
    left_start: bool,
    end_distance: Option<f64>,
    waypoint_hits: SmallVec<[Option<f64>; 4]>,
}

impl Runtime {
    fn enter(segment: &StrokeSegment, timestamp: f64) -> Self {
        Self {
            entered_at: timestamp,
            last_at: timestamp,
            waypoint_hits: segment.waypoints().iter().map(|_| None).collect(),
            ..Self::default()
        }
    }

    /// Raise the furthest arc reached and mark the waypoints it passes.
    fn advance(&mut self, segment: &StrokeSegment, arc_length: f64, timestamp: f64) {
        self.max_arc = self.max_arc.max(arc_length);
        for (hit, waypoint) in self.waypoint_hits.iter_mut().zip(segment.waypoints()) {
            if hit.is_none() && waypoint.arc_length <= self.max_arc + WAYPOINT_TOLERANCE {
                *hit = Some(timestamp);
            }
        }
    }

    fn travelled_ratio(&self, segment: &StrokeSegment) -> f64 {
        if segment.is_degenerate() {
            // Entering the capture zone of a dot covers all of it.
            1.0
        } else {
            (self.max_arc / segment.length()).min(1.0)
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Sample counts are far below 2^52."
)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Incremental trace analyzer over a fixed list of stroke segments.
///
/// Feed samples in non-decreasing timestamp order with [`TraceAnalyzer::push`].
/// Per-stroke runtime state is kept between calls, so a host can push newly
/// captured samples as they arrive and read [`TraceAnalyzer::snapshot`] for
/// live feedback, then call [`TraceAnalyzer::finish`] once the attempt ends.
#[derive(Clone, Debug)]
pub struct TraceAnalyzer<'a> {
    segments: &'a [StrokeSegment],
    config: &'a TraceConfig,
    reports: Vec<StrokeReport>,
    current: usize,
    phase: TracePhase,
    runtime: Runtime,
    completed: usize,
    failure: Option<Failure>,
    warning: Option<Warning>,
    last_timestamp: f64,
}

impl<'a> TraceAnalyzer<'a> {
    /// Create an analyzer awaiting the first segment.
    pub fn new(segments: &'a [StrokeSegment], config: &'a TraceConfig) -> Self {
        Self {
            segments,
            config,
            reports: segments.iter().map(StrokeReport::pending).collect(),
            current: 0,
            phase: TracePhase::Waiting,
            runtime: Runtime::default(),
            completed: 0,
            failure: None,
            warning: None,
            last_timestamp: f64::NEG_INFINITY,
        }
    }

    /// Process one sample.
    ///
    /// Samples arriving after a failure or after the last stroke completed
    /// are ignored.
    pub fn push(&mut self, sample: &Sample) {
        if self.failure.is_some() || self.current >= self.segments.len() {
            return;
        }
        debug_assert!(
            sample.timestamp >= self.last_timestamp,
            "samples must arrive in non-decreasing timestamp order"
        );
        self.last_timestamp = sample.timestamp;
        match self.phase {
            TracePhase::Waiting => self.on_waiting(sample),
            TracePhase::Inside => self.on_inside(sample),
        }
    }

    /// Process samples in order.
    pub fn extend<'s>(&mut self, samples: impl IntoIterator<Item = &'s Sample>) {
        for sample in samples {
            self.push(sample);
        }
    }

    /// Whether a terminal failure has been recorded.
    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Index of the stroke currently awaited or drawn.
    pub fn current_stroke(&self) -> usize {
        self.current
    }

    /// Phase of the current stroke.
    pub fn phase(&self) -> TracePhase {
        self.phase
    }

    /// The live result, without end-of-attempt finalization.
    ///
    /// A stroke in progress reports its ratios so far; no `MissedStart` is
    /// inferred for strokes the learner simply has not reached yet.
    pub fn snapshot(&self) -> TraceResult {
        let mut reports = self.reports.clone();
        if self.failure.is_none() && self.phase == TracePhase::Inside {
            if let Some(segment) = self.segments.get(self.current) {
                self.write_runtime(segment, &mut reports[self.current]);
            }
        }
        self.result(reports)
    }

    /// Finalize the run and produce its result.
    ///
    /// If the attempt ends while awaiting a stroke, that stroke must have been
    /// approached to within [`START_APPROACH_FACTOR`] × start radius, otherwise
    /// the run fails with [`FailureReason::MissedStart`]. A stroke in progress
    /// keeps its partial ratios but is not marked completed.
    pub fn finish(mut self) -> TraceResult {
        let segments = self.segments;
        if self.failure.is_none() {
            if let Some(segment) = segments.get(self.current) {
                match self.phase {
                    TracePhase::Waiting => {
                        let limit = START_APPROACH_FACTOR * segment.start_circle().radius;
                        let approached = self.reports[self.current]
                            .start_distance
                            .is_some_and(|d| d.is_finite() && d <= limit);
                        if !approached {
                            self.fail(FailureReason::MissedStart, None);
                        }
                    }
                    TracePhase::Inside => {
                        let mut report = self.reports[self.current].clone();
                        self.write_runtime(segment, &mut report);
                        self.reports[self.current] = report;
                    }
                }
            }
        }
        let reports = core::mem::take(&mut self.reports);
        self.result(reports)
    }

    fn result(&self, reports: Vec<StrokeReport>) -> TraceResult {
        TraceResult {
            reports,
            failure: self.failure,
            completed_strokes: self.completed,
            next_stroke: self.current,
            phase: self.phase,
            warning: self.warning,
        }
    }

    fn on_waiting(&mut self, sample: &Sample) {
        let segments = self.segments;
        let segment = &segments[self.current];
        let distance = segment.start_distance(sample.location);
        let report = &mut self.reports[self.current];
        report.start_distance = Some(report.start_distance.map_or(distance, |d| d.min(distance)));

        if distance <= segment.start_circle().radius {
            self.enter(sample);
            return;
        }
        if segments
            .get(self.current + 1)
            .is_some_and(|next| next.contains_start(sample.location))
        {
            self.fail(FailureReason::MissedStart, Some(sample.timestamp));
        }
    }

    fn enter(&mut self, sample: &Sample) {
        let segments = self.segments;
        let segment = &segments[self.current];
        log::debug!(
            "stroke {} entered at t={:.3}",
            self.current,
            sample.timestamp
        );
        self.phase = TracePhase::Inside;
        self.runtime = Runtime::enter(segment, sample.timestamp);
        self.reports[self.current].started_at = Some(sample.timestamp);
        self.on_inside(sample);
    }

    fn on_inside(&mut self, sample: &Sample) {
        let segments = self.segments;
        let segment = &segments[self.current];
        let config = self.config;
        let location = sample.location;
        let timestamp = sample.timestamp;
        let projection = segment.project(location);

        let rt = &mut self.runtime;
        rt.total += 1;
        rt.last_at = timestamp;
        rt.max_deviation = rt.max_deviation.max(projection.distance);

        if projection.distance > config.soft_limit {
            log::trace!(
                "stroke {}: sample {:.1} from centerline exceeds soft limit",
                self.current,
                projection.distance
            );
            self.sync_report();
            self.fail(FailureReason::LeftCorridor, Some(timestamp));
            return;
        }
        let deviated = projection.distance > config.corridor_radius;
        if deviated {
            rt.outside += 1;
        } else {
            rt.inside += 1;
        }

        rt.advance(segment, projection.arc_length, timestamp);

        let travelled = rt.travelled_ratio(segment);
        let slow = timestamp - rt.entered_at >= config.slow_progress_seconds
            && travelled < config.slow_progress_ratio;

        if !segment.contains_start(location) {
            rt.left_start = true;
        }
        let end_distance = segment.end_distance(location);
        rt.end_distance = Some(rt.end_distance.map_or(end_distance, |d| d.min(end_distance)));
        let armed = rt.left_start
            || segment.is_degenerate()
            || rt.max_arc + WAYPOINT_TOLERANCE >= segment.length();
        let at_end = armed && end_distance <= segment.end_circle().radius;
        if at_end && rt.max_arc + WAYPOINT_TOLERANCE >= segment.end_entry_arc() {
            // Arriving along the centerline covers what lies inside the end circle.
            rt.advance(segment, segment.length(), timestamp);
        }

        if deviated {
            self.warn(WarningKind::Deviation, timestamp, location);
        } else if slow {
            self.warn(WarningKind::SlowProgress, timestamp, location);
        }
        if at_end {
            self.reach_end(timestamp);
        }
    }

    fn reach_end(&mut self, timestamp: f64) {
        self.sync_report();
        let report = &self.reports[self.current];
        let reason = if !report.all_waypoints_hit() {
            Some(FailureReason::MissedWaypoint)
        } else if report.coverage_ratio < self.config.minimum_inside_ratio
            || report.travelled_ratio < self.config.minimum_travel_ratio
        {
            Some(FailureReason::InsufficientCoverage)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.fail(reason, Some(timestamp));
            return;
        }

        self.reports[self.current].completed = true;
        log::debug!("stroke {} completed at t={timestamp:.3}", self.current);
        self.completed += 1;
        self.current += 1;
        self.phase = TracePhase::Waiting;
        self.runtime = Runtime::default();
    }

    /// Copy the runtime counters into the current stroke's report.
    fn sync_report(&mut self) {
        let segments = self.segments;
        let segment = &segments[self.current];
        let mut report = core::mem::replace(
            &mut self.reports[self.current],
            StrokeReport::pending(segment),
        );
        self.write_runtime(segment, &mut report);
        self.reports[self.current] = report;
    }

    fn write_runtime(&self, segment: &StrokeSegment, report: &mut StrokeReport) {
        let rt = &self.runtime;
        report.coverage_ratio = ratio(rt.inside, rt.total);
        report.outside_ratio = ratio(rt.outside, rt.total);
        report.travelled_ratio = if rt.total == 0 {
            0.0
        } else {
            rt.travelled_ratio(segment)
        };
        report.max_deviation = rt.max_deviation;
        report.inside_samples = rt.inside;
        report.outside_samples = rt.outside;
        report.total_samples = rt.total;
        report.duration = rt.last_at - rt.entered_at;
        report.end_distance = rt.end_distance;
        for (hit, at) in report.waypoints.iter_mut().zip(&rt.waypoint_hits) {
            hit.hit_at = *at;
        }
    }

    fn fail(&mut self, reason: FailureReason, timestamp: Option<f64>) {
        log::debug!("trace failed on stroke {}: {reason:?}", self.current);
        self.failure = Some(Failure {
            reason,
            stroke: self.current,
            timestamp,
        });
    }

    fn warn(&mut self, kind: WarningKind, timestamp: f64, location: Point) {
        if self.warning.is_some() {
            return;
        }
        log::debug!("warning on stroke {}: {kind:?}", self.current);
        self.warning = Some(Warning {
            kind,
            stroke: self.current,
            timestamp,
            location,
        });
    }
}

/// Run a complete trace over `samples` and finalize it.
pub fn analyze(
    segments: &[StrokeSegment],
    samples: &[Sample],
    config: &TraceConfig,
) -> TraceResult {
    let mut analyzer = TraceAnalyzer::new(segments, config);
    analyzer.extend(samples);
    analyzer.finish()
}
