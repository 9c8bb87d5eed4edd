// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penmark Raster: render-based coverage validation of a handwriting attempt.
//!
//! An alternative to the streaming corridor analysis in `penmark_trace`:
//! rasterize the template centerlines as a thick "tube" and the learner's ink
//! into two single-channel [`tiny_skia::Mask`]s of the same size, then measure
//! the fraction of template pixels that student ink also covers.
//!
//! Alongside the pixel overlap, each template stroke is checked for entering
//! its start zone and reaching its end zone, yielding a [`RasterFailure`] in
//! priority order: missed start, missed end, then insufficient coverage.
//!
//! Rasterization cost grows with the template area times `raster_scale²`, so
//! hosts should run [`validate`] off latency-sensitive threads.

mod coverage;
mod error;
mod mask;
mod zones;

pub use coverage::{RasterFailure, RasterReport, validate};
pub use error::Error;
pub use zones::ZoneReport;

use penmark_template::{AttemptEvaluator, Drawing, PreparedTemplate};

/// Tunables for the raster coverage validator.
///
/// Widths and radii are canvas units; `raster_scale` is pixels per unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterConfig {
    /// Pixels per canvas unit.
    pub raster_scale: f64,
    /// Width of the template tube.
    pub tube_line_width: f64,
    /// Width of student ink.
    pub student_line_width: f64,
    /// Minimum covered fraction of template pixels.
    pub coverage_threshold: f64,
    /// Radius of each stroke's start zone.
    pub start_radius: f64,
    /// Radius of each stroke's end zone.
    pub end_radius: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            raster_scale: 2.0,
            tube_line_width: 24.0,
            student_line_width: 24.0,
            coverage_threshold: 0.6,
            start_radius: 24.0,
            end_radius: 24.0,
        }
    }
}

impl RasterConfig {
    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(Error::InvalidScale(self.raster_scale));
        }
        for width in [self.tube_line_width, self.student_line_width] {
            if !(width.is_finite() && width > 0.0) {
                return Err(Error::InvalidLineWidth(width));
            }
        }
        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return Err(Error::InvalidThreshold(self.coverage_threshold));
        }
        for radius in [self.start_radius, self.end_radius] {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(Error::InvalidRadius(radius));
            }
        }
        Ok(())
    }
}

impl AttemptEvaluator for RasterConfig {
    type Output = Result<RasterReport, Error>;

    fn evaluate(&self, template: &PreparedTemplate, drawing: &Drawing) -> Self::Output {
        validate(template, drawing, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RasterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_widths_and_radii() {
        let config = RasterConfig {
            student_line_width: f64::NAN,
            ..RasterConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidLineWidth(w)) if w.is_nan()));

        let config = RasterConfig {
            end_radius: -1.0,
            ..RasterConfig::default()
        };
        assert_eq!(config.validate(), Err(Error::InvalidRadius(-1.0)));
    }
}
