// SPDX-License-Identifier: MPL-2.0
//! Float comparison helpers shared by unit tests.

pub use approx::assert_abs_diff_eq;

/// Tolerance for viewport positions and color channels.
pub const VIEW_EPSILON: f32 = 1e-3;

/// Tolerance for crop fractions and ratios.
pub const FRACTION_EPSILON: f32 = 1e-4;

/// Tolerance for exact fraction round trips.
pub const EXACT_EPSILON: f32 = 1e-5;
