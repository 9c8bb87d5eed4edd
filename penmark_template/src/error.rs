// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Errors raised while validating a template or building geometry from it.
///
/// These describe malformed inputs. Outcomes of a practice attempt (a missed
/// start, leaving the corridor, ...) are never reported through this type.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The template contains no strokes.
    #[error("template has no strokes")]
    EmptyTemplate,
    /// A template stroke has no points.
    #[error("template stroke `{id}` has no points")]
    EmptyStroke {
        /// Identifier of the offending stroke.
        id: String,
    },
    /// Two strokes share the same drawing order.
    #[error("stroke order {order} is used more than once")]
    DuplicateOrder {
        /// The repeated order value.
        order: u32,
    },
    /// The template ascender metric is not a positive finite number.
    #[error("template ascender must be positive and finite, got {0}")]
    InvalidAscender(f64),
    /// The practice row ascender height is not a positive finite number.
    #[error("row ascender height must be positive and finite, got {0}")]
    InvalidRowHeight(f64),
    /// A waypoint fraction lies outside the open interval `(0, 1)`.
    #[error("waypoint fraction {0} is outside (0, 1)")]
    InvalidWaypointFraction(f64),
    /// Waypoint fractions are not strictly ascending.
    #[error("waypoint fractions must be strictly ascending")]
    UnsortedWaypoints,
    /// A capture radius is not a positive finite number.
    #[error("capture radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}
