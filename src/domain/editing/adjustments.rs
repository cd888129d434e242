// SPDX-License-Identifier: MPL-2.0
//! Tonal and color adjustment sliders.

use super::newtypes::{adjustment_bounds, SliderBounds};

/// One of the eight adjustment sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentKind {
    Brightness,
    Exposure,
    Gamma,
    Contrast,
    Saturation,
    Vibrance,
    Warmth,
    Enhance,
}

impl AdjustmentKind {
    /// All sliders in panel order.
    pub const ALL: [AdjustmentKind; 8] = [
        AdjustmentKind::Brightness,
        AdjustmentKind::Exposure,
        AdjustmentKind::Gamma,
        AdjustmentKind::Contrast,
        AdjustmentKind::Saturation,
        AdjustmentKind::Vibrance,
        AdjustmentKind::Warmth,
        AdjustmentKind::Enhance,
    ];

    #[must_use]
    pub fn bounds(self) -> SliderBounds {
        match self {
            AdjustmentKind::Gamma => adjustment_bounds::GAMMA,
            AdjustmentKind::Enhance => adjustment_bounds::ENHANCE,
            _ => adjustment_bounds::MULTIPLIER,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AdjustmentKind::Brightness => "Brightness",
            AdjustmentKind::Exposure => "Exposure",
            AdjustmentKind::Gamma => "Gamma",
            AdjustmentKind::Contrast => "Contrast",
            AdjustmentKind::Saturation => "Saturation",
            AdjustmentKind::Vibrance => "Vibrance",
            AdjustmentKind::Warmth => "Warmth",
            AdjustmentKind::Enhance => "Enhance",
        }
    }

    /// Whether the slider feeds the render filter.
    ///
    /// Gamma, vibrance and enhance are modeled and editable but have no
    /// visual effect.
    #[must_use]
    pub fn is_rendered(self) -> bool {
        !matches!(
            self,
            AdjustmentKind::Gamma | AdjustmentKind::Vibrance | AdjustmentKind::Enhance
        )
    }
}

/// The eight slider values of one photo. Always within bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    brightness: f32,
    exposure: f32,
    gamma: f32,
    contrast: f32,
    saturation: f32,
    vibrance: f32,
    warmth: f32,
    enhance: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: adjustment_bounds::MULTIPLIER.neutral,
            exposure: adjustment_bounds::MULTIPLIER.neutral,
            gamma: adjustment_bounds::GAMMA.neutral,
            contrast: adjustment_bounds::MULTIPLIER.neutral,
            saturation: adjustment_bounds::MULTIPLIER.neutral,
            vibrance: adjustment_bounds::MULTIPLIER.neutral,
            warmth: adjustment_bounds::MULTIPLIER.neutral,
            enhance: adjustment_bounds::ENHANCE.neutral,
        }
    }
}

impl Adjustments {
    #[must_use]
    pub fn get(&self, kind: AdjustmentKind) -> f32 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Exposure => self.exposure,
            AdjustmentKind::Gamma => self.gamma,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
            AdjustmentKind::Vibrance => self.vibrance,
            AdjustmentKind::Warmth => self.warmth,
            AdjustmentKind::Enhance => self.enhance,
        }
    }

    /// Sets a slider, clamping to its range. Returns the stored value.
    ///
    /// Non-finite input is ignored and the previous value is kept.
    pub fn set(&mut self, kind: AdjustmentKind, value: f32) -> f32 {
        let Some(clamped) = kind.bounds().clamp(value) else {
            return self.get(kind);
        };
        let slot = match kind {
            AdjustmentKind::Brightness => &mut self.brightness,
            AdjustmentKind::Exposure => &mut self.exposure,
            AdjustmentKind::Gamma => &mut self.gamma,
            AdjustmentKind::Contrast => &mut self.contrast,
            AdjustmentKind::Saturation => &mut self.saturation,
            AdjustmentKind::Vibrance => &mut self.vibrance,
            AdjustmentKind::Warmth => &mut self.warmth,
            AdjustmentKind::Enhance => &mut self.enhance,
        };
        *slot = clamped;
        clamped
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, kind: AdjustmentKind, value: f32) -> Self {
        self.set(kind, value);
        self
    }

    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    #[must_use]
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    #[must_use]
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    #[must_use]
    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    #[must_use]
    pub fn warmth(&self) -> f32 {
        self.warmth
    }

    /// Returns true if any slider differs from its neutral value.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        AdjustmentKind::ALL
            .iter()
            .any(|kind| self.get(*kind) != kind.bounds().neutral)
    }

    /// Reset every slider to neutral.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
