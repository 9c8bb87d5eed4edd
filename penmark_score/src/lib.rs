// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penmark Score: post-hoc scoring of a finished handwriting attempt.
//!
//! Where the streaming analyzer answers "is the learner still on track", this
//! crate grades a completed [`Drawing`] against a [`PreparedTemplate`] with four
//! sub-scores and a weighted total, all integers in `0..=100`:
//!
//! | score | weight |
//! |---|---|
//! | shape | [`SHAPE_WEIGHT`] |
//! | order | [`ORDER_WEIGHT`] |
//! | direction | [`DIRECTION_WEIGHT`] |
//! | start | [`START_WEIGHT`] |
//!
//! [`evaluate`] is a pure function of its inputs. It rejects a
//! [`ScoreConfig`] that does not [validate](ScoreConfig::validate).
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use penmark_score::{ScoreConfig, evaluate};
//! use penmark_template::{
//!     Drawing, DrawnStroke, Metrics, PreparedTemplate, RowLayout, Template, TemplateStroke,
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
//! let prepared = PreparedTemplate::prepare(&template, RowLayout::new(300.0, 100.0, 40.0))?;
//!
//! let copy = DrawnStroke::from_points(0.0, 0.05, prepared.strokes()[0].points.iter().copied());
//! let score = evaluate(&prepared, &Drawing::from_strokes(vec![copy]), &ScoreConfig::default())?;
//! assert_eq!(score.total, 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]

extern crate alloc;

mod config;
mod error;
mod evaluate;

pub use config::ScoreConfig;
pub use error::Error;
pub use evaluate::{
    DIRECTION_WEIGHT, ORDER_WEIGHT, SHAPE_WEIGHT, START_WEIGHT, ScoreResult, evaluate,
};

use penmark_template::{AttemptEvaluator, Drawing, PreparedTemplate};

impl AttemptEvaluator for ScoreConfig {
    type Output = Result<ScoreResult, Error>;

    fn evaluate(&self, template: &PreparedTemplate, drawing: &Drawing) -> Self::Output {
        evaluate(template, drawing, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Point;
    use penmark_template::{DrawnStroke, Metrics, RowLayout, Template, TemplateStroke};

    #[test]
    fn evaluator_matches_the_free_function() {
        let template = Template::new(
            vec![TemplateStroke::new(
                "c",
                0,
                vec![
                    Point::new(40.0, 80.0),
                    Point::new(0.0, 40.0),
                    Point::new(40.0, 0.0),
                ],
            )],
            Metrics {
                ascender: 100.0,
                x_height: 80.0,
            },
        );
        let prepared =
            PreparedTemplate::prepare(&template, RowLayout::new(240.0, 120.0, 40.0)).unwrap();
        let drawing = Drawing::from_strokes(vec![DrawnStroke::from_points(
            0.0,
            0.02,
            [Point::new(100.0, 30.0), Point::new(70.0, 60.0), Point::new(95.0, 110.0)],
        )]);
        let config = ScoreConfig::default();
        let direct = evaluate(&prepared, &drawing, &config);
        assert_eq!(AttemptEvaluator::evaluate(&config, &prepared, &drawing), direct);
        assert!(direct.unwrap().total <= 100);
    }
}
