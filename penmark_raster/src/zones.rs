// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start and end zone tracking per template stroke.

use kurbo::Point;
use penmark_template::{PreparedStroke, Sample};

/// When a template stroke's capture zones were reached.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneReport {
    /// Whether the drawing has a non-empty stroke at the same index.
    pub attempted: bool,
    /// Timestamp of the first sample inside the start circle.
    pub started_at: Option<f64>,
    /// Timestamp of the first sample inside the end circle after the start.
    pub ended_at: Option<f64>,
}

/// Sample indices at which one stroke's zones were reached.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ZoneHits {
    pub(crate) start: Option<usize>,
    pub(crate) end: Option<usize>,
}

/// Find start and end hits for every stroke over time-ordered `samples`.
///
/// Strokes are searched in order. A stroke's start is looked for after the
/// previous stroke's start, in a different source stroke than that start. Its
/// end is the first sample inside the end circle once the pen has left the
/// start circle, or immediately for a stroke of zero length.
pub(crate) fn track(
    strokes: &[PreparedStroke],
    samples: &[Sample],
    start_radius: f64,
    end_radius: f64,
) -> Vec<ZoneHits> {
    let mut hits = Vec::with_capacity(strokes.len());
    let mut cursor = 0;
    let mut previous_source = None;
    for stroke in strokes {
        let in_start = |p: Point| p.distance(stroke.start) <= start_radius;
        let in_end = |p: Point| p.distance(stroke.end) <= end_radius;
        let start = samples
            .iter()
            .enumerate()
            .skip(cursor)
            .find(|(_, s)| previous_source != Some(s.stroke) && in_start(s.location))
            .map(|(i, _)| i);

        let end = start.and_then(|first| {
            let mut armed = is_dot(&stroke.points);
            samples[first..]
                .iter()
                .position(|s| {
                    armed |= !in_start(s.location);
                    armed && in_end(s.location)
                })
                .map(|offset| first + offset)
        });

        if let Some(first) = start {
            cursor = first + 1;
            previous_source = Some(samples[first].stroke);
        }
        hits.push(ZoneHits { start, end });
    }
    hits
}

fn is_dot(points: &[Point]) -> bool {
    points.windows(2).all(|pair| pair[0] == pair[1])
}
