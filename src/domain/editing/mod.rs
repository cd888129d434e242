// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for photo editing:
//! - [`Adjustments`]: The eight tonal/color sliders
//! - [`RotationDegrees`]: Accumulated 90° rotation
//! - [`CropRect`] / [`ViewRect`]: Crop geometry in normalized and viewport units
//! - [`EditState`]: The complete editable state of one photo

pub mod adjustments;
pub mod geometry;
pub mod newtypes;
pub mod state;

pub use adjustments::{AdjustmentKind, Adjustments};
pub use geometry::{CropRect, Point, Size, ViewRect};
pub use newtypes::{adjustment_bounds, RotationDegrees, SliderBounds};
pub use state::{EditState, EditStatePatch};
