// SPDX-License-Identifier: MPL-2.0
//! Photo identity and file format.

use std::fmt;

/// Opaque identifier of a photo in the collection.
///
/// Allocated by the store from a monotonic counter, so ids are never reused
/// within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(u64);

impl PhotoId {
    #[must_use]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photo-{}", self.0)
    }
}

/// Image container formats accepted by intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    WebP,
    Heic,
    Heif,
}

impl PhotoFormat {
    /// Maps a file extension (case-insensitive, without dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(PhotoFormat::Jpeg),
            "png" => Some(PhotoFormat::Png),
            "webp" => Some(PhotoFormat::WebP),
            "heic" => Some(PhotoFormat::Heic),
            "heif" => Some(PhotoFormat::Heif),
            _ => None,
        }
    }

    /// Maps a MIME type such as `image/jpeg`, ignoring parameters.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoFormat::Jpeg),
            "image/png" => Some(PhotoFormat::Png),
            "image/webp" => Some(PhotoFormat::WebP),
            "image/heic" => Some(PhotoFormat::Heic),
            "image/heif" => Some(PhotoFormat::Heif),
            _ => None,
        }
    }

    /// Canonical extension for files written in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Png => "png",
            PhotoFormat::WebP => "webp",
            PhotoFormat::Heic => "heic",
            PhotoFormat::Heif => "heif",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
            PhotoFormat::WebP => "image/webp",
            PhotoFormat::Heic => "image/heic",
            PhotoFormat::Heif => "image/heif",
        }
    }

    /// Whether browsers and the preview pipeline can show this format as-is.
    #[must_use]
    pub fn is_displayable(self) -> bool {
        !matches!(self, PhotoFormat::Heic | PhotoFormat::Heif)
    }
}

/// Extracts the lowercase extension of a file name, if any.
#[must_use]
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Replaces (or appends) the extension of a file name.
#[must_use]
pub fn with_extension(file_name: &str, ext: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{stem}.{ext}"),
        _ => format!("{file_name}.{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_id_display_is_opaque_label() {
        assert_eq!(PhotoId::from_raw(7).to_string(), "photo-7");
    }

    #[test]
    fn extensions_map_case_insensitively() {
        assert_eq!(PhotoFormat::from_extension("JPG"), Some(PhotoFormat::Jpeg));
        assert_eq!(PhotoFormat::from_extension("jpeg"), Some(PhotoFormat::Jpeg));
        assert_eq!(PhotoFormat::from_extension("HeIc"), Some(PhotoFormat::Heic));
        assert_eq!(PhotoFormat::from_extension("gif"), None);
    }

    #[test]
    fn mime_types_ignore_parameters() {
        assert_eq!(
            PhotoFormat::from_mime("image/png; charset=binary"),
            Some(PhotoFormat::Png)
        );
        assert_eq!(PhotoFormat::from_mime("text/html"), None);
    }

    #[test]
    fn heic_family_is_not_displayable() {
        assert!(!PhotoFormat::Heic.is_displayable());
        assert!(!PhotoFormat::Heif.is_displayable());
        assert!(PhotoFormat::WebP.is_displayable());
    }

    #[test]
    fn file_extension_handles_edge_cases() {
        assert_eq!(file_extension("holiday.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("archive.tar.png").as_deref(), Some("png"));
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("no_extension"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn with_extension_replaces_or_appends() {
        assert_eq!(with_extension("IMG_0001.HEIC", "jpg"), "IMG_0001.jpg");
        assert_eq!(with_extension("capture", "jpg"), "capture.jpg");
    }
}
