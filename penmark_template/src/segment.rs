// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length indexed stroke geometry used for tracking a pen against a
//! prepared stroke.
//!
//! A [`StrokeSegment`] owns a copy of the stroke's centerline, a prefix sum of
//! edge lengths, circular capture zones at the declared start and end, and a
//! table of waypoints at fixed fractions of the total length.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};
use smallvec::SmallVec;

use crate::{Error, PreparedStroke, PreparedTemplate};

/// Projection search stops at the first edge closer than this.
pub const GOOD_ENOUGH_DISTANCE: f64 = 0.5;

/// Parameters for building [`StrokeSegment`]s.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentConfig {
    /// Radius of the start capture circle.
    pub start_radius: f64,
    /// Radius of the end capture circle.
    pub end_radius: f64,
    /// Waypoint positions as fractions of stroke length, strictly ascending
    /// and strictly between 0 and 1.
    pub waypoint_fractions: Vec<f64>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            start_radius: 24.0,
            end_radius: 24.0,
            waypoint_fractions: alloc::vec![0.25, 0.5, 0.75],
        }
    }
}

impl SegmentConfig {
    /// Check radii and waypoint fractions.
    pub fn validate(&self) -> Result<(), Error> {
        for radius in [self.start_radius, self.end_radius] {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(Error::InvalidRadius(radius));
            }
        }
        if let Some(&f) = self
            .waypoint_fractions
            .iter()
            .find(|f| !(**f > 0.0 && **f < 1.0))
        {
            return Err(Error::InvalidWaypointFraction(f));
        }
        if self.waypoint_fractions.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::UnsortedWaypoints);
        }
        Ok(())
    }
}

/// Nearest point on a segment's polyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Distance from the query point to `point`.
    pub distance: f64,
    /// Arc length along the polyline at `point`.
    pub arc_length: f64,
    /// The projected point.
    pub point: Point,
}

/// A required checkpoint along a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// Position as a fraction of the stroke length.
    pub fraction: f64,
    /// `fraction × length`.
    pub arc_length: f64,
    /// Polyline point at `arc_length`.
    pub point: Point,
}

/// Derived, immutable geometry for one prepared stroke.
#[derive(Clone, Debug)]
pub struct StrokeSegment {
    index: usize,
    start: Circle,
    end: Circle,
    points: Vec<Point>,
    /// `cumulative[i]` is the arc length at `points[i]`.
    cumulative: Vec<f64>,
    waypoints: SmallVec<[Waypoint; 4]>,
    end_entry: f64,
}

impl StrokeSegment {
    /// Build the segment for the stroke at `index` in its prepared template.
    ///
    /// `config` is assumed valid; see [`SegmentConfig::validate`].
    pub fn new(index: usize, stroke: &PreparedStroke, config: &SegmentConfig) -> Self {
        let points = stroke.points.clone();
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        let mut prev: Option<Point> = None;
        for &p in &points {
            if let Some(q) = prev {
                total += q.distance(p);
            }
            cumulative.push(total);
            prev = Some(p);
        }

        let mut segment = Self {
            index,
            start: Circle::new(stroke.start, config.start_radius),
            end: Circle::new(stroke.end, config.end_radius),
            points,
            cumulative,
            waypoints: SmallVec::new(),
            end_entry: 0.0,
        };
        segment.end_entry = segment.find_end_entry();
        if !segment.is_degenerate() {
            let length = segment.length();
            segment.waypoints = config
                .waypoint_fractions
                .iter()
                .map(|&fraction| {
                    let arc_length = fraction * length;
                    Waypoint {
                        fraction,
                        arc_length,
                        point: segment.point_at(arc_length),
                    }
                })
                .collect();
        }
        segment
    }

    /// Build one segment per stroke of `template`, in drawing order.
    pub fn build_all(
        template: &PreparedTemplate,
        config: &SegmentConfig,
    ) -> Result<Vec<Self>, Error> {
        config.validate()?;
        Ok(template
            .strokes()
            .iter()
            .enumerate()
            .map(|(index, stroke)| Self::new(index, stroke, config))
            .collect())
    }

    /// Position of the stroke in drawing order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Start capture circle.
    pub fn start_circle(&self) -> Circle {
        self.start
    }

    /// End capture circle.
    pub fn end_circle(&self) -> Circle {
        self.end
    }

    /// Centerline points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Arc length at which the centerline enters the end circle for the last
    /// time.
    ///
    /// Everything beyond it lies inside the end circle. Zero when the whole
    /// centerline is inside; the full length when the last point is outside
    /// (an explicit end away from the centerline).
    pub fn end_entry_arc(&self) -> f64 {
        self.end_entry
    }

    fn find_end_entry(&self) -> f64 {
        let center = self.end.center;
        let radius = self.end.radius;
        let Some(k) = self
            .points
            .iter()
            .rposition(|p| p.distance(center) > radius)
        else {
            return 0.0;
        };
        if k + 1 >= self.points.len() {
            return self.length();
        }
        // Edge k leaves the outside; take the smaller root of
        // |p0 + t·v − center| = radius.
        let (p0, p1) = (self.points[k], self.points[k + 1]);
        let v = p1 - p0;
        let w = p0 - center;
        let a = v.hypot2();
        let b = 2.0 * w.dot(v);
        let c = w.hypot2() - radius * radius;
        let discriminant = (b * b - 4.0 * a * c).max(0.0);
        let t = ((-b - discriminant.sqrt()) / (2.0 * a)).clamp(0.0, 1.0);
        self.cumulative[k] + t * (self.cumulative[k + 1] - self.cumulative[k])
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// True for single-point or zero-length strokes.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2 || self.length() <= 0.0
    }

    /// Waypoints in ascending arc-length order. Empty for degenerate strokes.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Distance from `pt` to the start circle's center.
    pub fn start_distance(&self, pt: Point) -> f64 {
        self.start.center.distance(pt)
    }

    /// Distance from `pt` to the end circle's center.
    pub fn end_distance(&self, pt: Point) -> f64 {
        self.end.center.distance(pt)
    }

    /// Whether `pt` lies within the start circle (boundary included).
    pub fn contains_start(&self, pt: Point) -> bool {
        self.start_distance(pt) <= self.start.radius
    }

    /// Whether `pt` lies within the end circle (boundary included).
    pub fn contains_end(&self, pt: Point) -> bool {
        self.end_distance(pt) <= self.end.radius
    }

    /// Project `pt` onto the polyline.
    ///
    /// Edges are scanned in order and the first one closer than
    /// [`GOOD_ENOUGH_DISTANCE`] ends the search. Degenerate strokes project
    /// onto their first point with arc length 0.
    pub fn project(&self, pt: Point) -> Projection {
        let anchor = self.points.first().copied().unwrap_or(self.start.center);
        let mut best = Projection {
            distance: anchor.distance(pt),
            arc_length: 0.0,
            point: anchor,
        };
        if self.is_degenerate() {
            return best;
        }
        for (i, edge) in self.points.windows(2).enumerate() {
            let (p0, p1) = (edge[0], edge[1]);
            let v = p1 - p0;
            let w = pt - p0;
            let len2 = v.hypot2();
            let t = if len2 > 0.0 {
                (w.dot(v) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let proj = p0 + v * t;
            let distance = proj.distance(pt);
            if distance < best.distance {
                let edge_length = self.cumulative[i + 1] - self.cumulative[i];
                best = Projection {
                    distance,
                    arc_length: self.cumulative[i] + t * edge_length,
                    point: proj,
                };
                if distance < GOOD_ENOUGH_DISTANCE {
                    break;
                }
            }
        }
        best
    }

    /// Polyline point at `arc_length`, clamped to the stroke's extent.
    pub fn point_at(&self, arc_length: f64) -> Point {
        let Some(&first) = self.points.first() else {
            return self.start.center;
        };
        if arc_length <= 0.0 || self.is_degenerate() {
            return first;
        }
        // First vertex at or beyond the requested arc length.
        let idx = self.cumulative.partition_point(|&c| c < arc_length);
        if idx >= self.points.len() {
            return self.points[self.points.len() - 1];
        }
        if idx == 0 {
            return first;
        }
        let (c0, c1) = (self.cumulative[idx - 1], self.cumulative[idx]);
        let span = c1 - c0;
        let t = if span > 0.0 { (arc_length - c0) / span } else { 0.0 };
        self.points[idx - 1].lerp(self.points[idx], t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn stroke(points: Vec<Point>) -> PreparedStroke {
        PreparedStroke {
            id: String::from("s"),
            order: 0,
            start: points[0],
            end: points[points.len() - 1],
            points,
        }
    }

    fn l_shape() -> StrokeSegment {
        // Down 100, then right 50.
        StrokeSegment::new(
            0,
            &stroke(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 100.0),
                Point::new(50.0, 100.0),
            ]),
            &SegmentConfig::default(),
        )
    }

    #[test]
    fn cumulative_length_and_waypoints() {
        let seg = l_shape();
        assert_eq!(seg.length(), 150.0);
        let arcs: Vec<f64> = seg.waypoints().iter().map(|w| w.arc_length).collect();
        assert_eq!(arcs, [37.5, 75.0, 112.5]);
        assert_eq!(seg.waypoints()[2].point, Point::new(12.5, 100.0));
    }

    #[test]
    fn end_entry_is_where_the_centerline_meets_the_end_circle() {
        let seg = l_shape();
        // The last edge runs along y = 100 towards (50, 100); radius 24.
        assert!((seg.end_entry_arc() - 126.0).abs() < 1e-9, "{}", seg.end_entry_arc());

        let short = StrokeSegment::new(
            0,
            &stroke(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
            &SegmentConfig::default(),
        );
        assert_eq!(short.end_entry_arc(), 0.0);

        let mut off_end = stroke(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        off_end.end = Point::new(100.0, 50.0);
        let seg = StrokeSegment::new(0, &off_end, &SegmentConfig::default());
        assert_eq!(seg.end_entry_arc(), 100.0);
    }

    #[test]
    fn projection_on_vertex_is_exact() {
        let seg = l_shape();
        let p = seg.project(Point::new(0.0, 100.0));
        assert_eq!(p.distance, 0.0);
        assert_eq!(p.arc_length, 100.0);

        let p = seg.project(Point::new(50.0, 100.0));
        assert_eq!(p.distance, 0.0);
        assert_eq!(p.arc_length, 150.0);
    }

    #[test]
    fn projection_clamps_to_edges() {
        let seg = l_shape();
        let p = seg.project(Point::new(-10.0, 50.0));
        assert_eq!(p.distance, 10.0);
        assert_eq!(p.arc_length, 50.0);
        assert_eq!(p.point, Point::new(0.0, 50.0));

        let p = seg.project(Point::new(70.0, 100.0));
        assert_eq!(p.distance, 20.0);
        assert_eq!(p.arc_length, 150.0);
    }

    #[test]
    fn capture_circles() {
        let seg = l_shape();
        assert!(seg.contains_start(Point::new(0.0, 24.0)));
        assert!(!seg.contains_start(Point::new(0.0, 25.0)));
        assert!(seg.contains_end(Point::new(40.0, 100.0)));
        assert_eq!(seg.end_distance(Point::new(50.0, 90.0)), 10.0);
    }

    #[test]
    fn degenerate_stroke_has_no_waypoints() {
        let dot = StrokeSegment::new(
            0,
            &stroke(vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0)]),
            &SegmentConfig::default(),
        );
        assert!(dot.is_degenerate());
        assert!(dot.waypoints().is_empty());
        let p = dot.project(Point::new(8.0, 9.0));
        assert_eq!(p.point, Point::new(5.0, 5.0));
        assert_eq!(p.distance, 5.0);
        assert_eq!(p.arc_length, 0.0);

        let single = StrokeSegment::new(
            0,
            &stroke(vec![Point::new(1.0, 1.0)]),
            &SegmentConfig::default(),
        );
        assert_eq!(single.length(), 0.0);
        assert!(single.waypoints().is_empty());
    }

    #[test]
    fn point_at_walks_edges() {
        let seg = l_shape();
        assert_eq!(seg.point_at(-5.0), Point::new(0.0, 0.0));
        assert_eq!(seg.point_at(50.0), Point::new(0.0, 50.0));
        assert_eq!(seg.point_at(125.0), Point::new(25.0, 100.0));
        assert_eq!(seg.point_at(500.0), Point::new(50.0, 100.0));
    }

    #[test]
    fn config_validation() {
        assert_eq!(SegmentConfig::default().validate(), Ok(()));
        let bad = SegmentConfig {
            waypoint_fractions: vec![0.5, 1.0],
            ..SegmentConfig::default()
        };
        assert_eq!(bad.validate(), Err(Error::InvalidWaypointFraction(1.0)));
        let unsorted = SegmentConfig {
            waypoint_fractions: vec![0.6, 0.3],
            ..SegmentConfig::default()
        };
        assert_eq!(unsorted.validate(), Err(Error::UnsortedWaypoints));
        let radius = SegmentConfig {
            start_radius: -1.0,
            ..SegmentConfig::default()
        };
        assert_eq!(radius.validate(), Err(Error::InvalidRadius(-1.0)));
    }
}
