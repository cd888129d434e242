// SPDX-License-Identifier: MPL-2.0
//! Image handling: render filters, raster transforms, previews and format
//! conversion.

pub mod filter;
pub mod image_transform;
pub mod preview;
pub mod transcode;

use crate::domain::photo::{file_extension, PhotoFormat};
use image_rs::ImageReader;
use std::io::Cursor;

pub use filter::{build_render_filter, find_preset, FilterPreset, FilterTerm, PRESETS};
pub use preview::{PreviewHandle, PreviewId, PreviewRegistry};
pub use transcode::{default_transcoder, ImageRsTranscoder, Transcoder};

/// Detects the photo format from a file name's extension.
#[must_use]
pub fn detect_format(file_name: &str) -> Option<PhotoFormat> {
    file_extension(file_name).and_then(|ext| PhotoFormat::from_extension(&ext))
}

/// Reads pixel dimensions from encoded bytes without decoding the image.
///
/// Best effort: returns `None` for formats the decoder does not know.
#[must_use]
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Format file size in human-readable format.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    // display only, precision loss above 2^53 is irrelevant
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if bytes >= MB {
        format!("{:.2} MB", value / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", value / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
