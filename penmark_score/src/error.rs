// Copyright 2025 the Penmark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Score configuration errors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The deviation tolerance must be finite and positive.
    #[error("deviation tolerance must be finite and positive, got {0}")]
    InvalidDeviationTolerance(f64),
    /// The start tolerance must be finite and non-negative.
    #[error("start tolerance must be finite and non-negative, got {0}")]
    InvalidStartTolerance(f64),
    /// The reference spacing must be finite and positive.
    #[error("reference spacing must be finite and positive, got {0}")]
    InvalidReferenceSpacing(f64),
}
