// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;

/// Tunables for the completed-drawing evaluator, in canvas units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreConfig {
    /// Average nearest distance at which the shape score reaches zero.
    ///
    /// Each nearest distance is capped at twice this value. Must be positive.
    pub deviation_tolerance: f64,
    /// A stroke starting within this distance of its template start counts as
    /// a match; further away the start score falls off linearly.
    pub start_tolerance: f64,
    /// Every `sample_stride`-th drawn point is compared for the shape score.
    ///
    /// Zero is treated as one.
    pub sample_stride: usize,
    /// Largest gap between reference points along a template centerline.
    pub reference_spacing: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            deviation_tolerance: 20.0,
            start_tolerance: 24.0,
            sample_stride: 4,
            reference_spacing: 1.0,
        }
    }
}

impl ScoreConfig {
    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<(), Error> {
        let deviation = self.deviation_tolerance;
        if !(deviation.is_finite() && deviation > 0.0) {
            return Err(Error::InvalidDeviationTolerance(deviation));
        }
        let start = self.start_tolerance;
        if !(start.is_finite() && start >= 0.0) {
            return Err(Error::InvalidStartTolerance(start));
        }
        let spacing = self.reference_spacing;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidReferenceSpacing(spacing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(ScoreConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_tolerances() {
        let zero = ScoreConfig {
            deviation_tolerance: 0.0,
            ..ScoreConfig::default()
        };
        assert_eq!(zero.validate(), Err(Error::InvalidDeviationTolerance(0.0)));

        let start = ScoreConfig {
            start_tolerance: -1.0,
            ..ScoreConfig::default()
        };
        assert_eq!(start.validate(), Err(Error::InvalidStartTolerance(-1.0)));

        let spacing = ScoreConfig {
            reference_spacing: f64::INFINITY,
            ..ScoreConfig::default()
        };
        assert_eq!(
            spacing.validate(),
            Err(Error::InvalidReferenceSpacing(f64::INFINITY))
        );
    }
}
