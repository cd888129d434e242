// SPDX-License-Identifier: MPL-2.0
//! Raster flattening of a photo's edit state: flip, rotate, crop, filter.

use crate::domain::editing::{CropRect, EditState, RotationDegrees};
use crate::media::filter::{build_render_filter, parse_render_filter, FilterTerm};
use image_rs::{imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};

// ==========================================================================
// Geometry
// ==========================================================================

/// Rotates clockwise by a normalized quarter-turn angle.
#[must_use]
pub fn rotate(image: &DynamicImage, rotation: RotationDegrees) -> DynamicImage {
    match rotation.normalized() {
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        _ => image.clone(),
    }
}

/// Crop the image to the specified pixel rectangle.
///
/// The rectangle is clamped to the image boundaries and is at least 1×1.
#[must_use]
pub fn crop(image: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> DynamicImage {
    let img_width = image.width();
    let img_height = image.height();

    let x = x.min(img_width.saturating_sub(1));
    let y = y.min(img_height.saturating_sub(1));

    let width = width.min(img_width.saturating_sub(x)).max(1);
    let height = height.min(img_height.saturating_sub(y)).max(1);

    image.crop_imm(x, y, width, height)
}

/// Crops to a region expressed in fractions of the image.
#[must_use]
pub fn crop_normalized(image: &DynamicImage, rect: CropRect) -> DynamicImage {
    if rect.is_full() {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    let to_px = |fraction: f32, side: u32| -> u32 {
        // fraction is within 0..=1, so the product fits the side
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = (f64::from(fraction) * f64::from(side)).round() as u32;
        px.min(side)
    };
    crop(
        image,
        to_px(rect.x(), w),
        to_px(rect.y(), h),
        to_px(rect.width(), w),
        to_px(rect.height(), h),
    )
}

/// Applies flips, then rotation, then crop.
///
/// Flips act on the unrotated image; the crop is read in the displayed
/// (rotated) frame, which is how the editor stores it.
#[must_use]
pub fn apply_geometry(image: &DynamicImage, state: &EditState) -> DynamicImage {
    let mut out = if state.flip_horizontal {
        image.fliph()
    } else {
        image.clone()
    };
    if state.flip_vertical {
        out = out.flipv();
    }
    if state.rotation.is_rotated() {
        out = rotate(&out, state.rotation);
    }
    match state.crop {
        Some(rect) => crop_normalized(&out, rect),
        None => out,
    }
}

// ==========================================================================
// Color
// ==========================================================================

/// Runs each filter term over every pixel, leaving alpha untouched.
#[must_use]
pub fn apply_filter_terms(image: &DynamicImage, terms: &[FilterTerm]) -> DynamicImage {
    if terms.is_empty() {
        return image.clone();
    }

    let mut rgba: RgbaImage = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let mut color = [r, g, b].map(|c| f32::from(c) / 255.0);
        for term in terms {
            color = term.apply(color);
        }
        let [r, g, b] = color.map(|c| {
            // apply() clamps to 0..=1
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let byte = (c * 255.0).round() as u8;
            byte
        });
        *pixel = Rgba([r, g, b, a]);
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Flattens a photo: geometry first, then its render filter.
#[must_use]
pub fn apply_edit_state(image: &DynamicImage, state: &EditState) -> DynamicImage {
    let shaped = apply_geometry(image, state);
    let filter = build_render_filter(&state.adjustments, &state.filter_preset_id);
    apply_filter_terms(&shaped, &parse_render_filter(&filter))
}

/// Scales and center-crops to exactly fill `width × height`.
#[must_use]
pub fn fill(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_to_fill(width.max(1), height.max(1), FilterType::Lanczos3)
}
