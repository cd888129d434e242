// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Collection**: Photo slot capacity
//! - **Intake**: File size ceiling and accepted formats
//! - **Editor**: History depth and crop geometry
//! - **Fetch**: Remote import settings

// ==========================================================================
// Collection Defaults
// ==========================================================================

/// Number of photos a magnet grid holds.
pub const MAX_PHOTOS: usize = 9;

/// Smallest configurable grid.
pub const MIN_PHOTOS: usize = 1;

/// Largest configurable grid.
pub const MAX_CONFIGURABLE_PHOTOS: usize = 64;

// ==========================================================================
// Intake Defaults
// ==========================================================================

/// Byte ceiling for a single uploaded photo (20 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 20 * 1024 * 1024;

/// Accepted file extensions (lowercase, without dot).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "heic", "heif"];

/// Extensions that need transcoding before they can be displayed.
pub const TRANSCODE_EXTENSIONS: &[&str] = &["heic", "heif"];

/// JPEG quality used when transcoding HEIC/HEIF payloads.
pub const TRANSCODE_JPEG_QUALITY: u8 = 90;

// ==========================================================================
// Editor Defaults
// ==========================================================================

/// Maximum number of snapshots kept by the undo/redo log.
pub const HISTORY_LIMIT: usize = 20;

/// Minimum crop rectangle side, in viewport units.
pub const MIN_CROP_SIZE: f32 = 40.0;

/// Radius around a crop handle that still grabs it, in viewport units.
pub const CROP_HANDLE_HIT_RADIUS: f32 = 22.0;

// ==========================================================================
// Sheet Defaults
// ==========================================================================

/// Largest accepted cell side of a print sheet, in pixels.
pub const MAX_SHEET_CELL_SIZE: u32 = 4096;

/// Largest side of a rendered print sheet, in pixels.
pub const MAX_SHEET_SIDE: u32 = 16_384;

// ==========================================================================
// Fetch Defaults
// ==========================================================================

/// Timeout for a remote photo import, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent with remote imports.
pub const FETCH_USER_AGENT: &str = concat!("MagnetStudio/", env!("CARGO_PKG_VERSION"));

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_PHOTOS > 0);
    assert!(MAX_PHOTOS >= MIN_PHOTOS);
    assert!(MAX_PHOTOS <= MAX_CONFIGURABLE_PHOTOS);

    assert!(MAX_FILE_SIZE_BYTES > 0);
    assert!(TRANSCODE_JPEG_QUALITY > 0 && TRANSCODE_JPEG_QUALITY <= 100);

    assert!(HISTORY_LIMIT > 0);
    assert!(MIN_CROP_SIZE > 0.0);
    assert!(CROP_HANDLE_HIT_RADIUS > 0.0);

    assert!(DEFAULT_FETCH_TIMEOUT_SECS > 0);
};
