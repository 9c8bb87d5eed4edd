// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One practice attempt at a lowercase "t", judged three ways.
//!
//! This example shows how to:
//! - fit a letter template into a practice row with `penmark_template`,
//! - stream samples through `penmark_trace` while the pen moves, reading live
//!   snapshots,
//! - grade the finished drawing with `penmark_score` and `penmark_raster`.
//!
//! Run:
//! - `cargo run -p penmark_demos --example practice_attempt`

use kurbo::Point;
use penmark_raster::RasterConfig;
use penmark_score::ScoreConfig;
use penmark_template::{
    AttemptEvaluator, Drawing, DrawnStroke, Handedness, Metrics, PreparedTemplate, RowLayout,
    StrokeSegment, Template, TemplateStroke,
};
use penmark_trace::{TraceAnalyzer, TraceConfig};

fn letter_t() -> Template {
    Template::new(
        vec![
            TemplateStroke::new(
                "stem",
                0,
                vec![
                    Point::new(0.0, 140.0),
                    Point::new(0.0, 20.0),
                    Point::new(10.0, 0.0),
                    Point::new(30.0, 0.0),
                ],
            ),
            TemplateStroke::new(
                "cross",
                1,
                vec![Point::new(-25.0, 100.0), Point::new(35.0, 100.0)],
            ),
        ],
        Metrics {
            ascender: 160.0,
            x_height: 100.0,
        },
    )
}

/// Resample a polyline every `step` units and add a small sideways wobble.
fn wobbly_copy(points: &[Point], step: f64, wobble: f64) -> Vec<Point> {
    let mut out = vec![points[0]];
    for pair in points.windows(2) {
        let d = pair[1] - pair[0];
        let n = (d.hypot() / step).ceil().max(1.0);
        let normal = d.turn_90() / d.hypot().max(1e-9);
        for i in 1..=(n as u32) {
            let t = f64::from(i) / n;
            let offset = wobble * (f64::from(i) * 1.7).sin();
            out.push(pair[0].lerp(pair[1], t) + normal * offset);
        }
    }
    out
}

fn main() {
    let template = letter_t();
    let layout = RowLayout::new(320.0, 160.0, 48.0);
    let mut prepared = PreparedTemplate::prepare(&template, layout).expect("valid template");

    // Switching hands mirrors the prepared geometry; switching back restores it.
    let left = PreparedTemplate::prepare(&template, layout.with_handedness(Handedness::Left))
        .expect("valid template");
    println!(
        "right-handed start {:?}, left-handed start {:?}",
        prepared.first_start(),
        left.first_start()
    );

    // A small resize does not require rebuilding.
    let resized = RowLayout::new(320.6, 160.0, 48.0);
    if prepared.needs_rebuild(&resized) {
        prepared = PreparedTemplate::prepare(&template, resized).expect("valid template");
    }

    // The learner's attempt: each template stroke redrawn with a little wobble.
    let mut drawing = Drawing::new();
    for (i, stroke) in prepared.strokes().iter().enumerate() {
        let points = wobbly_copy(&stroke.points, 6.0, 4.0);
        drawing.push(DrawnStroke::from_points(i as f64 * 1.5, 1.0 / 60.0, points));
    }

    // Live tracing: push samples as they would arrive and peek every so often.
    let trace_config = TraceConfig::default();
    let segments = StrokeSegment::build_all(&prepared, &trace_config.segment)
        .expect("valid segment config");
    let mut analyzer = TraceAnalyzer::new(&segments, &trace_config);
    for (n, sample) in drawing.samples().iter().enumerate() {
        analyzer.push(sample);
        if n % 20 == 0 {
            let live = analyzer.snapshot();
            println!(
                "t={:.2}s stroke {} {:?} warning={:?}",
                sample.timestamp,
                live.next_stroke,
                live.phase,
                live.warning.map(|w| w.kind)
            );
        }
    }
    let trace = analyzer.finish();
    println!(
        "trace: complete={} failure={:?} completed={}/{}",
        trace.is_complete(),
        trace.failure_reason(),
        trace.completed_strokes,
        trace.reports.len()
    );
    for (stroke, report) in prepared.strokes().iter().zip(&trace.reports) {
        println!(
            "  {:>5}: coverage {:.2}, travelled {:.2}, max deviation {:.1}",
            stroke.id, report.coverage_ratio, report.travelled_ratio, report.max_deviation
        );
    }

    // The same drawing through the two post-hoc strategies.
    match ScoreConfig::default().evaluate(&prepared, &drawing) {
        Ok(score) => println!(
            "score: total {} (shape {}, order {}, direction {}, start {})",
            score.total, score.shape, score.order, score.direction, score.start
        ),
        Err(err) => println!("score: {err}"),
    }

    match RasterConfig::default().evaluate(&prepared, &drawing) {
        Ok(report) => println!(
            "raster: {:.1}% of template ink covered, failure {:?}",
            100.0 * report.coverage_ratio,
            report.failure
        ),
        Err(err) => println!("raster: {err}"),
    }
}
