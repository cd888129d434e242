// SPDX-License-Identifier: MPL-2.0
//! Render-filter model.
//!
//! Maps the slider values of a photo and its preset to a CSS-style filter
//! string such as `brightness(1.3) grayscale(1) contrast(1.2)`. The same string
//! drives both the on-screen preview and the raster export, which parses it
//! back into [`FilterTerm`]s.
//!
//! # Example
//!
//! ```
//! use magnet_studio::domain::editing::{AdjustmentKind, Adjustments};
//! use magnet_studio::media::filter::build_render_filter;
//!
//! let adjustments = Adjustments::default().with(AdjustmentKind::Brightness, 1.3);
//! assert_eq!(
//!     build_render_filter(&adjustments, "noir"),
//!     "brightness(1.3) grayscale(1) contrast(1.2) brightness(0.95)"
//! );
//! assert_eq!(build_render_filter(&Adjustments::default(), ""), "none");
//! ```

use crate::domain::editing::Adjustments;
use std::fmt;

/// Filter value meaning "render untouched".
pub const NO_FILTER: &str = "none";

/// Sepia intensity per unit of warmth above neutral.
const WARMTH_SEPIA_FACTOR: f32 = 0.4;

// =============================================================================
// Presets
// =============================================================================

/// A named, fixed filter applied after the slider terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPreset {
    pub id: &'static str,
    pub label: &'static str,
    /// Filter text, empty for the identity preset.
    pub filter: &'static str,
}

/// Preset catalog in display order.
pub const PRESETS: &[FilterPreset] = &[
    FilterPreset {
        id: "original",
        label: "Original",
        filter: "",
    },
    FilterPreset {
        id: "vivid",
        label: "Vivid",
        filter: "saturate(1.4) contrast(1.1)",
    },
    FilterPreset {
        id: "warm",
        label: "Warm",
        filter: "sepia(0.25) saturate(1.2) brightness(1.05)",
    },
    FilterPreset {
        id: "cool",
        label: "Cool",
        filter: "hue-rotate(-15deg) saturate(0.9) brightness(1.05)",
    },
    FilterPreset {
        id: "vintage",
        label: "Vintage",
        filter: "sepia(0.45) contrast(0.9) brightness(1.1)",
    },
    FilterPreset {
        id: "noir",
        label: "Noir",
        filter: "grayscale(1) contrast(1.2) brightness(0.95)",
    },
    FilterPreset {
        id: "fade",
        label: "Fade",
        filter: "contrast(0.8) brightness(1.1) saturate(0.7)",
    },
    FilterPreset {
        id: "drama",
        label: "Drama",
        filter: "contrast(1.4) saturate(1.2) brightness(0.9)",
    },
];

/// Looks up a preset by id, ignoring ASCII case.
#[must_use]
pub fn find_preset(id: &str) -> Option<&'static FilterPreset> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    PRESETS.iter().find(|preset| preset.id.eq_ignore_ascii_case(id))
}

// =============================================================================
// Filter builder
// =============================================================================

/// Builds the render filter for a photo.
///
/// Slider terms come first in a fixed order (brightness, contrast, saturate,
/// warmth as sepia, exposure as a second brightness), each only when its
/// slider is off neutral. The preset filter is appended last. Returns
/// [`NO_FILTER`] when nothing applies. Unknown preset ids contribute nothing.
#[must_use]
pub fn build_render_filter(adjustments: &Adjustments, preset_id: &str) -> String {
    let mut terms: Vec<String> = Vec::with_capacity(6);

    if adjustments.brightness() != 1.0 {
        terms.push(FilterTerm::Brightness(adjustments.brightness()).to_string());
    }
    if adjustments.contrast() != 1.0 {
        terms.push(FilterTerm::Contrast(adjustments.contrast()).to_string());
    }
    if adjustments.saturation() != 1.0 {
        terms.push(FilterTerm::Saturate(adjustments.saturation()).to_string());
    }
    let sepia = (adjustments.warmth() - 1.0).max(0.0) * WARMTH_SEPIA_FACTOR;
    if sepia > 0.0 {
        terms.push(FilterTerm::Sepia(sepia).to_string());
    }
    if adjustments.exposure() != 1.0 {
        terms.push(FilterTerm::Brightness(adjustments.exposure()).to_string());
    }

    match find_preset(preset_id) {
        Some(preset) if !preset.filter.is_empty() => terms.push(preset.filter.to_string()),
        Some(_) => {}
        None if !preset_id.trim().is_empty() => {
            log::debug!("Unknown filter preset '{preset_id}' ignored");
        }
        None => {}
    }

    if terms.is_empty() {
        NO_FILTER.to_string()
    } else {
        terms.join(" ")
    }
}

/// Formats a filter argument rounded to 3 decimals, without trailing zeros.
fn format_amount(value: f32) -> String {
    let rounded = (f64::from(value) * 1000.0).round() / 1000.0;
    // -0.0 prints as "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

// =============================================================================
// Filter terms
// =============================================================================

/// One function of a filter string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterTerm {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Sepia(f32),
    Grayscale(f32),
    /// Angle in degrees.
    HueRotate(f32),
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTerm::Brightness(v) => write!(f, "brightness({})", format_amount(*v)),
            FilterTerm::Contrast(v) => write!(f, "contrast({})", format_amount(*v)),
            FilterTerm::Saturate(v) => write!(f, "saturate({})", format_amount(*v)),
            FilterTerm::Sepia(v) => write!(f, "sepia({})", format_amount(*v)),
            FilterTerm::Grayscale(v) => write!(f, "grayscale({})", format_amount(*v)),
            FilterTerm::HueRotate(v) => write!(f, "hue-rotate({}deg)", format_amount(*v)),
        }
    }
}

impl FilterTerm {
    /// Applies the term to a linear RGB triple in `0.0..=1.0`.
    ///
    /// Uses the color matrices of the CSS filter-effects functions. The result
    /// is clamped so terms can be chained.
    #[must_use]
    pub fn apply(self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match self {
            FilterTerm::Brightness(a) => [r * a, g * a, b * a],
            FilterTerm::Contrast(a) => [
                (r - 0.5) * a + 0.5,
                (g - 0.5) * a + 0.5,
                (b - 0.5) * a + 0.5,
            ],
            FilterTerm::Saturate(s) => {
                let m = saturate_matrix(s.max(0.0));
                mul(&m, [r, g, b])
            }
            FilterTerm::Grayscale(a) => {
                let m = grayscale_matrix(1.0 - a.clamp(0.0, 1.0));
                mul(&m, [r, g, b])
            }
            FilterTerm::Sepia(a) => {
                let m = sepia_matrix(1.0 - a.clamp(0.0, 1.0));
                mul(&m, [r, g, b])
            }
            FilterTerm::HueRotate(deg) => {
                let m = hue_rotate_matrix(deg.to_radians());
                mul(&m, [r, g, b])
            }
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }
}

type Matrix3 = [[f32; 3]; 3];

fn mul(m: &Matrix3, v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

/// `keep` is the share of original color left (1 - amount).
fn grayscale_matrix(keep: f32) -> Matrix3 {
    [
        [0.2126 + 0.7874 * keep, 0.7152 - 0.7152 * keep, 0.0722 - 0.0722 * keep],
        [0.2126 - 0.2126 * keep, 0.7152 + 0.2848 * keep, 0.0722 - 0.0722 * keep],
        [0.2126 - 0.2126 * keep, 0.7152 - 0.7152 * keep, 0.0722 + 0.9278 * keep],
    ]
}

fn sepia_matrix(keep: f32) -> Matrix3 {
    [
        [0.393 + 0.607 * keep, 0.769 - 0.769 * keep, 0.189 - 0.189 * keep],
        [0.349 - 0.349 * keep, 0.686 + 0.314 * keep, 0.168 - 0.168 * keep],
        [0.272 - 0.272 * keep, 0.534 - 0.534 * keep, 0.131 + 0.869 * keep],
    ]
}

fn hue_rotate_matrix(rad: f32) -> Matrix3 {
    let (sin, cos) = rad.sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

// =============================================================================
// Parser
// =============================================================================

/// Parses a filter string into terms, in order.
///
/// `"none"` and the empty string yield no terms. Functions this crate does not
/// render, and malformed arguments, are skipped.
#[must_use]
pub fn parse_render_filter(filter: &str) -> Vec<FilterTerm> {
    let filter = filter.trim();
    if filter.is_empty() || filter.eq_ignore_ascii_case(NO_FILTER) {
        return Vec::new();
    }

    let mut terms = Vec::new();
    let mut rest = filter;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')').map(|i| open + i) else {
            log::debug!("Unterminated filter function in '{filter}'");
            break;
        };
        let name = rest[..open].trim();
        let arg = rest[open + 1..close].trim();
        match parse_term(name, arg) {
            Some(term) => terms.push(term),
            None => log::debug!("Skipping filter function {name}({arg})"),
        }
        rest = &rest[close + 1..];
    }
    terms
}

fn parse_term(name: &str, arg: &str) -> Option<FilterTerm> {
    if name.eq_ignore_ascii_case("hue-rotate") {
        let degrees = arg.strip_suffix("deg").unwrap_or(arg);
        return parse_number(degrees).map(FilterTerm::HueRotate);
    }

    let amount = parse_amount(arg)?;
    match name.to_ascii_lowercase().as_str() {
        "brightness" => Some(FilterTerm::Brightness(amount)),
        "contrast" => Some(FilterTerm::Contrast(amount)),
        "saturate" => Some(FilterTerm::Saturate(amount)),
        "sepia" => Some(FilterTerm::Sepia(amount)),
        "grayscale" => Some(FilterTerm::Grayscale(amount)),
        _ => None,
    }
}

/// Parses a number or a percentage.
fn parse_amount(arg: &str) -> Option<f32> {
    match arg.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|v| v / 100.0),
        None => parse_number(arg),
    }
}

fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}
