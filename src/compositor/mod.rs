// SPDX-License-Identifier: MPL-2.0
//! Grid compositor.
//!
//! Lays the collection out in a fixed number of slots. Each filled slot
//! carries what a renderer needs to draw the photo as edited: its filter
//! string, its 90° transform and its crop. [`sheet`] rasterizes the same grid
//! into a print sheet.

pub mod sheet;

use crate::domain::editing::{CropRect, EditState};
use crate::domain::photo::PhotoId;
use crate::media::filter::build_render_filter;
use crate::store::PhotoEntry;
use std::fmt;

pub use sheet::{render_sheet, SheetOptions};

/// Rotation and mirroring of a rendered photo.
///
/// Applied as rotate, then flip horizontally, then flip vertically, in the
/// CSS sense (the rightmost function acts on the image first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    /// Clockwise angle in `0..360`, a multiple of 90.
    pub rotation: u16,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Transform {
    #[must_use]
    pub fn from_state(state: &EditState) -> Self {
        Self {
            rotation: state.rotation.normalized(),
            flip_horizontal: state.flip_horizontal,
            flip_vertical: state.flip_vertical,
        }
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.rotation == 0 && !self.flip_horizontal && !self.flip_vertical
    }

    /// Row-major 2×2 matrix `R · Fh · Fv` in screen coordinates (y down).
    #[must_use]
    pub fn matrix(&self) -> [[i32; 2]; 2] {
        let (cos, sin) = match self.rotation {
            90 => (0, 1),
            180 => (-1, 0),
            270 => (0, -1),
            _ => (1, 0),
        };
        let sx = if self.flip_horizontal { -1 } else { 1 };
        let sy = if self.flip_vertical { -1 } else { 1 };
        [[cos * sx, -sin * sy], [sin * sx, cos * sy]]
    }

    /// CSS `transform` value, `"none"` for the identity.
    #[must_use]
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "none");
        }
        let mut terms = Vec::with_capacity(3);
        if self.rotation != 0 {
            terms.push(format!("rotate({}deg)", self.rotation));
        }
        if self.flip_horizontal {
            terms.push("scaleX(-1)".to_string());
        }
        if self.flip_vertical {
            terms.push("scaleY(-1)".to_string());
        }
        write!(f, "{}", terms.join(" "))
    }
}

/// A photo placed in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledSlot {
    pub photo_id: PhotoId,
    pub file_name: String,
    pub filter: String,
    pub transform: Transform,
    pub crop: Option<CropRect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridSlot {
    Filled(FilledSlot),
    Empty,
}

impl GridSlot {
    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(self, GridSlot::Filled(_))
    }

    #[must_use]
    pub fn photo_id(&self) -> Option<PhotoId> {
        match self {
            GridSlot::Filled(slot) => Some(slot.photo_id),
            GridSlot::Empty => None,
        }
    }
}

/// Produces exactly `capacity` slots: the photos in order, then empties.
///
/// Photos beyond `capacity` are not shown.
#[must_use]
pub fn render_grid(photos: &[PhotoEntry], capacity: usize) -> Vec<GridSlot> {
    if photos.len() > capacity {
        log::debug!("Grid shows {capacity} of {} photos", photos.len());
    }

    let mut slots: Vec<GridSlot> = photos
        .iter()
        .take(capacity)
        .map(|entry| {
            let state = entry.state();
            GridSlot::Filled(FilledSlot {
                photo_id: entry.id(),
                file_name: entry.file_name().to_string(),
                filter: build_render_filter(&state.adjustments, &state.filter_preset_id),
                transform: Transform::from_state(state),
                crop: state.crop,
            })
        })
        .collect();
    slots.resize(capacity, GridSlot::Empty);
    slots
}

/// Pixel rectangle of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Square-ish arrangement of `capacity` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    capacity: u32,
}

impl GridLayout {
    /// `ceil(sqrt(capacity))` columns and as many rows as needed.
    #[must_use]
    pub fn for_capacity(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity.max(1)).unwrap_or(u32::MAX);
        let mut columns = 1_u32;
        while columns.saturating_mul(columns) < capacity {
            columns += 1;
        }
        let rows = capacity.div_ceil(columns);
        Self {
            columns,
            rows,
            capacity,
        }
    }

    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total size of a sheet with square cells of `cell` pixels separated
    /// and framed by `gap` pixels. `None` when a side overflows `u32`.
    #[must_use]
    pub fn sheet_size(&self, cell: u32, gap: u32) -> Option<(u32, u32)> {
        let span = |count: u32| {
            count
                .checked_mul(cell)?
                .checked_add(count.checked_add(1)?.checked_mul(gap)?)
        };
        Some((span(self.columns)?, span(self.rows)?))
    }

    /// Rectangle of slot `index`, filled row by row. `None` past capacity
    /// or when the offset overflows `u32`.
    #[must_use]
    pub fn cell_rect(&self, index: usize, cell: u32, gap: u32) -> Option<CellRect> {
        let index = u32::try_from(index).ok().filter(|i| *i < self.capacity)?;
        let column = index % self.columns;
        let row = index / self.columns;
        let pitch = cell.checked_add(gap)?;
        let offset = |n: u32| gap.checked_add(n.checked_mul(pitch)?);
        Some(CellRect {
            x: offset(column)?,
            y: offset(row)?,
            width: cell,
            height: cell,
        })
    }
}
