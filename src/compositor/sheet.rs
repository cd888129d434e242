// SPDX-License-Identifier: MPL-2.0
//! Print sheet rendering.
//!
//! Rasterizes the grid: every photo is flattened through its edit state,
//! scaled to fill a square cell, and composited onto a sheet. Empty slots
//! are drawn as placeholders.

use super::GridLayout;
use crate::config::defaults::{MAX_SHEET_CELL_SIZE, MAX_SHEET_SIDE};
use crate::error::{Error, Result};
use crate::media::image_transform::{apply_edit_state, fill};
use crate::store::PhotoEntry;
use image_rs::{imageops, DynamicImage, Rgba, RgbaImage};

/// Layout and colors of a rendered sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    /// Side of each square cell in pixels.
    pub cell_size: u32,
    /// Gutter between cells and around the sheet in pixels.
    pub gap: u32,
    pub background: [u8; 4],
    pub placeholder: [u8; 4],
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            cell_size: 600,
            gap: 12,
            background: [255, 255, 255, 255],
            placeholder: [230, 230, 230, 255],
        }
    }
}

impl SheetOptions {
    /// Checks the cell and gutter sizes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the cell is empty or larger than
    /// [`MAX_SHEET_CELL_SIZE`], or the gutter is wider than a cell.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 || self.cell_size > MAX_SHEET_CELL_SIZE {
            return Err(Error::Config(format!(
                "cell size must be between 1 and {MAX_SHEET_CELL_SIZE} px, got {}",
                self.cell_size
            )));
        }
        if self.gap > self.cell_size {
            return Err(Error::Config(format!(
                "gap of {} px is wider than the {} px cell",
                self.gap, self.cell_size
            )));
        }
        Ok(())
    }
}

/// Renders `photos` into a sheet with `capacity` cells.
///
/// # Errors
///
/// Returns [`Error::Config`] for options rejected by
/// [`SheetOptions::validate`], [`Error::Image`] when the sheet would exceed
/// [`MAX_SHEET_SIDE`], or [`Error::Image`] naming the photo whose bytes
/// cannot be decoded.
pub fn render_sheet(
    photos: &[PhotoEntry],
    capacity: usize,
    options: &SheetOptions,
) -> Result<DynamicImage> {
    options.validate()?;
    let layout = GridLayout::for_capacity(capacity);
    let cell = options.cell_size;
    let (width, height) = layout
        .sheet_size(cell, options.gap)
        .filter(|(w, h)| *w <= MAX_SHEET_SIDE && *h <= MAX_SHEET_SIDE)
        .ok_or_else(|| {
            Error::Image(format!(
                "a {}x{} sheet of {cell} px cells exceeds {MAX_SHEET_SIDE} px",
                layout.columns(),
                layout.rows()
            ))
        })?;
    let mut sheet = RgbaImage::from_pixel(width, height, Rgba(options.background));
    let placeholder = RgbaImage::from_pixel(cell, cell, Rgba(options.placeholder));

    for index in 0..capacity {
        let Some(rect) = layout.cell_rect(index, cell, options.gap) else {
            break;
        };
        let tile = match photos.get(index) {
            Some(entry) => render_tile(entry, cell)?,
            None => placeholder.clone(),
        };
        imageops::replace(&mut sheet, &tile, i64::from(rect.x), i64::from(rect.y));
    }

    log::info!(
        "Rendered {width}x{height} sheet with {} of {capacity} photo(s)",
        photos.len().min(capacity)
    );
    Ok(DynamicImage::ImageRgba8(sheet))
}

fn render_tile(entry: &PhotoEntry, cell: u32) -> Result<RgbaImage> {
    let decoded = image_rs::load_from_memory(entry.bytes())
        .map_err(|e| Error::Image(format!("cannot decode {}: {e}", entry.file_name())))?;
    let flattened = apply_edit_state(&decoded, entry.state());
    Ok(fill(&flattened, cell, cell).to_rgba8())
}
