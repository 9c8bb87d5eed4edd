// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Result types produced by the trace analyzer.

use alloc::vec::Vec;

use kurbo::Point;
use penmark_template::StrokeSegment;

/// Terminal outcome that ends a trace run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureReason {
    /// The learner never entered the stroke's start zone, or skipped ahead to
    /// the next stroke's start zone.
    MissedStart,
    /// A sample went further than the soft limit from the centerline.
    LeftCorridor,
    /// The end zone was reached with too few inside samples or too little of
    /// the stroke travelled.
    InsufficientCoverage,
    /// The end zone was reached before every waypoint was passed.
    MissedWaypoint,
}

/// A terminal failure and where it happened.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Failure {
    /// What went wrong.
    pub reason: FailureReason,
    /// Index of the stroke being drawn (or awaited) at the time.
    pub stroke: usize,
    /// Timestamp of the deciding sample; `None` when decided at finalization.
    pub timestamp: Option<f64>,
}

/// Advisory, non-terminal feedback.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningKind {
    /// A sample fell outside the corridor but within the soft limit.
    Deviation,
    /// The learner has spent a long time on a stroke without much progress.
    SlowProgress,
}

/// A warning event. At most one is retained per run; the first one wins.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    /// Kind of warning.
    pub kind: WarningKind,
    /// Index of the stroke being drawn.
    pub stroke: usize,
    /// Timestamp of the triggering sample.
    pub timestamp: f64,
    /// Location of the triggering sample.
    pub location: Point,
}

/// Hit state of one waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointHit {
    /// Waypoint position as a fraction of stroke length.
    pub fraction: f64,
    /// When the waypoint was reached, if it was.
    pub hit_at: Option<f64>,
}

/// What was observed for one template stroke.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeReport {
    /// Closest approach to the start circle center while awaiting the stroke.
    pub start_distance: Option<f64>,
    /// Closest approach to the end circle center while drawing the stroke.
    pub end_distance: Option<f64>,
    /// `inside_samples / total_samples`.
    pub coverage_ratio: f64,
    /// `outside_samples / total_samples`.
    pub outside_ratio: f64,
    /// Furthest arc length reached divided by stroke length.
    pub travelled_ratio: f64,
    /// Largest distance from the centerline seen while drawing.
    pub max_deviation: f64,
    /// Samples within the corridor.
    pub inside_samples: usize,
    /// Samples between the corridor and the soft limit.
    pub outside_samples: usize,
    /// All samples tracked against this stroke.
    pub total_samples: usize,
    /// Timestamp of the sample that entered the start zone.
    pub started_at: Option<f64>,
    /// Time between the first and last tracked sample.
    pub duration: f64,
    /// Per-waypoint hits in arc-length order.
    pub waypoints: Vec<WaypointHit>,
    /// Whether the stroke passed its end-zone checks.
    pub completed: bool,
}

impl StrokeReport {
    pub(crate) fn pending(segment: &StrokeSegment) -> Self {
        Self {
            start_distance: None,
            end_distance: None,
            coverage_ratio: 0.0,
            outside_ratio: 0.0,
            travelled_ratio: 0.0,
            max_deviation: 0.0,
            inside_samples: 0,
            outside_samples: 0,
            total_samples: 0,
            started_at: None,
            duration: 0.0,
            waypoints: segment
                .waypoints()
                .iter()
                .map(|w| WaypointHit {
                    fraction: w.fraction,
                    hit_at: None,
                })
                .collect(),
            completed: false,
        }
    }

    /// Whether every waypoint was reached.
    pub fn all_waypoints_hit(&self) -> bool {
        self.waypoints.iter().all(|w| w.hit_at.is_some())
    }
}

/// Which condition the analyzer is waiting on for the current stroke.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TracePhase {
    /// Waiting for a sample inside the current stroke's start circle.
    #[default]
    Waiting,
    /// Tracking samples against the current stroke's corridor.
    Inside,
}

/// Outcome of a trace run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceResult {
    /// One report per template stroke, in drawing order.
    pub reports: Vec<StrokeReport>,
    /// The terminal failure, if any.
    pub failure: Option<Failure>,
    /// Number of strokes that completed.
    pub completed_strokes: usize,
    /// Index of the first stroke not yet completed (`reports.len()` when done).
    pub next_stroke: usize,
    /// Phase of the stroke at `next_stroke`.
    pub phase: TracePhase,
    /// The retained warning, if any. Not an exhaustive record.
    pub warning: Option<Warning>,
}

impl TraceResult {
    /// Whether every stroke completed without a failure.
    ///
    /// A run over zero strokes is never complete.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
            && !self.reports.is_empty()
            && self.completed_strokes == self.reports.len()
    }

    /// The failure reason, if any.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        self.failure.map(|f| f.reason)
    }
}
