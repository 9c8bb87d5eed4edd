// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use penmark_template::SegmentConfig;

/// Tunables for the streaming trace analyzer.
///
/// Distances are canvas units, times are seconds, ratios are in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceConfig {
    /// Capture circles and waypoints used to build segments.
    pub segment: SegmentConfig,
    /// Samples at most this far from the centerline count as inside.
    pub corridor_radius: f64,
    /// Samples beyond this distance end the attempt with `LeftCorridor`.
    ///
    /// Between `corridor_radius` and `soft_limit` a sample is outside and
    /// raises a deviation warning.
    pub soft_limit: f64,
    /// Minimum fraction of inside samples for a stroke to complete.
    pub minimum_inside_ratio: f64,
    /// Minimum fraction of the stroke length that must be travelled.
    pub minimum_travel_ratio: f64,
    /// Time spent inside a stroke before slow progress is reported.
    pub slow_progress_seconds: f64,
    /// Slow progress is reported while the travelled ratio is below this.
    pub slow_progress_ratio: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            segment: SegmentConfig::default(),
            corridor_radius: 18.0,
            soft_limit: 36.0,
            minimum_inside_ratio: 0.7,
            minimum_travel_ratio: 0.8,
            slow_progress_seconds: 4.0,
            slow_progress_ratio: 0.5,
        }
    }
}
