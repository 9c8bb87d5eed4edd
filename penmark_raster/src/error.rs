// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Raster validator configuration and canvas errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The raster scale must be finite and positive.
    #[error("raster scale must be finite and positive, got {0}")]
    InvalidScale(f64),
    /// Line widths must be finite and positive.
    #[error("line width must be finite and positive, got {0}")]
    InvalidLineWidth(f64),
    /// The coverage threshold must lie in `[0, 1]`.
    #[error("coverage threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),
    /// Capture radii must be finite and non-negative.
    #[error("capture radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
    /// The template bounds do not map to a usable pixel extent.
    #[error("template extent {0} cannot be rasterized")]
    InvalidExtent(f64),
    /// The mask could not be allocated.
    #[error("cannot allocate a {width}x{height} mask")]
    CanvasTooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}
