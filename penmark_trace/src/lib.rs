// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penmark Trace: streaming validation of a pen trace against a letter template.
//!
//! The analyzer consumes a time-ordered [`Sample`](penmark_template::Sample) stream and the
//! [`StrokeSegment`]s of a prepared template, and decides stroke by stroke
//! whether the learner started in the right place, stayed within the corridor
//! around the centerline, passed every waypoint, and finished in the end zone.
//!
//! - [`TraceAnalyzer`] – incremental state machine. Push samples as they are
//!   captured, read [`TraceAnalyzer::snapshot`] for live feedback, and call
//!   [`TraceAnalyzer::finish`] at the end of the attempt.
//! - [`analyze`] – one-shot helper over a complete sample list.
//! - [`TraceResult`] – one [`StrokeReport`] per template stroke, an optional
//!   terminal [`Failure`], and at most one advisory [`Warning`].
//! - [`TraceConfig`] – corridor, soft limit, coverage thresholds and the
//!   [`SegmentConfig`](penmark_template::SegmentConfig) used to build segments.
//!
//! Failures are ordinary outcomes of practice and are returned as values.
//! Only one warning is retained per run (the first); it is meant for live
//! nudges and is not an exhaustive record of every deviation.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use penmark_template::{PreparedStroke, Sample, StrokeSegment};
//! use penmark_trace::{TraceConfig, analyze};
//!
//! let config = TraceConfig::default();
//! let stroke = PreparedStroke {
//!     id: "stem".into(),
//!     order: 0,
//!     points: vec![Point::new(100.0, 0.0), Point::new(100.0, 200.0)],
//!     start: Point::new(100.0, 0.0),
//!     end: Point::new(100.0, 200.0),
//! };
//! let segments = [StrokeSegment::new(0, &stroke, &config.segment)];
//!
//! let samples: Vec<Sample> = (0..=10)
//!     .map(|i| Sample {
//!         location: Point::new(100.0, f64::from(i) * 20.0),
//!         timestamp: f64::from(i) * 0.05,
//!         stroke: 0,
//!     })
//!     .collect();
//!
//! let result = analyze(&segments, &samples, &config);
//! assert!(result.is_complete());
//! ```

#![no_std]

extern crate alloc;

mod analyzer;
mod config;
mod report;

pub use analyzer::{START_APPROACH_FACTOR, TraceAnalyzer, WAYPOINT_TOLERANCE, analyze};
pub use config::TraceConfig;
pub use report::{
    Failure, FailureReason, StrokeReport, TracePhase, TraceResult, Warning, WarningKind,
    WaypointHit,
};

use penmark_template::{AttemptEvaluator, Drawing, Error, PreparedTemplate, StrokeSegment};

/// Runs the streaming analyzer over a finished drawing.
///
/// Segments are rebuilt on every call; hosts tracing live should build them
/// once per prepared template and drive a [`TraceAnalyzer`] directly.
impl AttemptEvaluator for TraceConfig {
    type Output = Result<TraceResult, Error>;

    fn evaluate(&self, template: &PreparedTemplate, drawing: &Drawing) -> Self::Output {
        let segments = StrokeSegment::build_all(template, &self.segment)?;
        Ok(analyze(&segments, &drawing.samples(), self))
    }
}
