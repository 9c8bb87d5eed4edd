// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penmark Template: letter templates and the geometry derived from them.
//!
//! This crate holds the shared data model for evaluating handwriting practice
//! attempts against a reference letterform, built on top of [`kurbo`].
//!
//! - [`Template`] – the reference letter: ordered [`TemplateStroke`]s with
//!   optional explicit start/end points and [`Metrics`].
//! - [`PreparedTemplate`] – the template fitted into a practice row
//!   ([`RowLayout`]): sorted, scaled, centered, y-flipped, and mirrored for
//!   [`Handedness::Left`]. Callers cache it and consult
//!   [`PreparedTemplate::needs_rebuild`] when the canvas changes.
//! - [`StrokeSegment`] – arc-length indexed geometry per prepared stroke with
//!   capture circles, waypoints, and [`StrokeSegment::project`].
//! - [`Drawing`] – the learner's strokes; [`Drawing::samples`] flattens them
//!   into one time-ordered [`Sample`] stream.
//! - [`AttemptEvaluator`] – the capability shared by the evaluation strategies
//!   in sibling crates (streaming trace, raster coverage, completed-drawing
//!   score). Their result types are deliberately distinct.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use penmark_template::{
//!     Metrics, PreparedTemplate, RowLayout, SegmentConfig, StrokeSegment, Template,
//!     TemplateStroke,
//! };
//!
//! let template = Template::new(
//!     vec![TemplateStroke::new(
//!         "stem",
//!         0,
//!         vec![Point::new(0.0, 100.0), Point::new(0.0, 0.0)],
//!     )],
//!     Metrics { ascender: 100.0, x_height: 50.0 },
//! );
//!
//! // Fit into a 300-wide row whose ascender is 150 tall.
//! let prepared = PreparedTemplate::prepare(&template, RowLayout::new(300.0, 150.0, 50.0))?;
//! let segments = StrokeSegment::build_all(&prepared, &SegmentConfig::default())?;
//!
//! assert_eq!(segments[0].length(), 150.0);
//! let projection = segments[0].project(Point::new(160.0, 75.0));
//! assert_eq!(projection.arc_length, 75.0);
//! # Ok::<(), penmark_template::Error>(())
//! ```
//!
//! All coordinates after preparation are canvas units with `y` growing
//! downwards. The crate assumes no NaNs in input geometry.

#![no_std]

extern crate alloc;

mod drawing;
mod error;
mod prepare;
pub mod segment;
mod template;

pub use drawing::{Drawing, DrawnStroke, Sample, TimedPoint};
pub use error::Error;
pub use prepare::{
    DEFAULT_HORIZONTAL_PADDING, Handedness, PreparedStroke, PreparedTemplate, RowLayout,
    WIDTH_EPSILON,
};
pub use segment::{Projection, SegmentConfig, StrokeSegment, Waypoint};
pub use template::{Metrics, Template, TemplateStroke};

/// A strategy that judges a finished [`Drawing`] against a [`PreparedTemplate`].
///
/// Implemented by the configuration types of the evaluation crates, so a host
/// can hold several strategies side by side and run whichever fits. Each
/// strategy keeps its own output (and failure vocabulary).
pub trait AttemptEvaluator {
    /// What the strategy produces.
    type Output;

    /// Evaluate `drawing` against `template`.
    ///
    /// Implementations are pure: the same inputs always produce the same output.
    fn evaluate(&self, template: &PreparedTemplate, drawing: &Drawing) -> Self::Output;
}
