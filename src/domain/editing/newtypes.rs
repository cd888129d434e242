// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for editing values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Slider Bounds
// =============================================================================

/// Range and neutral value of one adjustment slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    /// Minimum slider value.
    pub min: f32,
    /// Maximum slider value.
    pub max: f32,
    /// Value that leaves the photo untouched.
    pub neutral: f32,
}

impl SliderBounds {
    /// Clamps `value` into the slider range.
    ///
    /// Non-finite input yields `None` so callers can keep their current value.
    #[must_use]
    pub fn clamp(self, value: f32) -> Option<f32> {
        value.is_finite().then(|| value.clamp(self.min, self.max))
    }
}

/// Slider bounds per adjustment.
pub mod adjustment_bounds {
    use super::SliderBounds;

    /// Multiplicative sliders spanning 0×–2×.
    pub const MULTIPLIER: SliderBounds = SliderBounds {
        min: 0.0,
        max: 2.0,
        neutral: 1.0,
    };

    /// Gamma curve exponent.
    pub const GAMMA: SliderBounds = SliderBounds {
        min: 0.2,
        max: 2.2,
        neutral: 1.0,
    };

    /// Purely additive enhancement amount.
    pub const ENHANCE: SliderBounds = SliderBounds {
        min: 0.0,
        max: 1.0,
        neutral: 0.0,
    };
}

// =============================================================================
// RotationDegrees
// =============================================================================

/// Accumulated rotation in 90° steps.
///
/// Unlike a display angle, the stored value is not wrapped: rotating clockwise
/// three times yields 270 and a fourth time 360. Renderers call
/// [`normalized`](Self::normalized) to get a value in `0..360`.
///
/// # Example
///
/// ```
/// use magnet_studio::domain::editing::RotationDegrees;
///
/// let angle = RotationDegrees::default().rotate_counterclockwise();
/// assert_eq!(angle.degrees(), -90);
/// assert_eq!(angle.normalized(), 270);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationDegrees(i32);

impl RotationDegrees {
    /// No rotation.
    pub const ZERO: Self = Self(0);

    /// Creates a rotation, rounding down to the nearest 90° step.
    #[must_use]
    pub fn new(degrees: i32) -> Self {
        let rem = degrees.rem_euclid(90);
        // at i32::MIN rounding down is not representable, round up instead
        Self(degrees.checked_sub(rem).unwrap_or(degrees + (90 - rem)))
    }

    /// Returns the accumulated angle.
    #[must_use]
    pub fn degrees(self) -> i32 {
        self.0
    }

    /// Returns the angle wrapped into `0..360`.
    #[must_use]
    pub fn normalized(self) -> u16 {
        // rem_euclid keeps the result in 0..360, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wrapped = self.0.rem_euclid(360) as u16;
        wrapped
    }

    /// Rotates 90° clockwise.
    #[must_use]
    pub fn rotate_clockwise(self) -> Self {
        self.step(90)
    }

    /// Rotates 90° counter-clockwise.
    #[must_use]
    pub fn rotate_counterclockwise(self) -> Self {
        self.step(-90)
    }

    /// Adds `delta`, restarting from the normalized angle when the sum
    /// leaves the `i32` range.
    fn step(self, delta: i32) -> Self {
        Self(
            self.0
                .checked_add(delta)
                .unwrap_or_else(|| i32::from(self.normalized()) + delta),
        )
    }

    /// Returns true if the rendered image is rotated at all.
    #[must_use]
    pub fn is_rotated(self) -> bool {
        self.normalized() != 0
    }

    /// Returns true if width and height swap when rendering (90° and 270°).
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self.normalized(), 90 | 270)
    }
}

// =============================================================================
// Tests
// =============================================================================
