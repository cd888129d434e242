// SPDX-License-Identifier: MPL-2.0
//! Conversion of non-displayable containers (HEIC/HEIF) to baseline JPEG.

use crate::config::defaults::TRANSCODE_JPEG_QUALITY;
use crate::domain::photo::PhotoFormat;
use crate::error::{Error, Result};
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::DynamicImage;
use std::sync::Arc;

/// Port for format conversion.
///
/// Called from a blocking worker, so implementations may do heavy CPU work.
/// Implementations must be `Send + Sync` to be shared across intake tasks.
pub trait Transcoder: Send + Sync {
    /// Converts `bytes` in `source` format to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be decoded or the JPEG cannot be
    /// encoded.
    fn to_jpeg(&self, bytes: &[u8], source: PhotoFormat) -> Result<Vec<u8>>;
}

/// Decodes with `image` and re-encodes as JPEG.
///
/// The decoder sniffs the content, so files whose payload is in a format the
/// `image` crate knows convert even when their extension says otherwise. True
/// HEVC-coded HEIC payloads fail with an [`Error::Image`].
#[derive(Debug, Clone, Copy)]
pub struct ImageRsTranscoder {
    quality: u8,
}

impl Default for ImageRsTranscoder {
    fn default() -> Self {
        Self {
            quality: TRANSCODE_JPEG_QUALITY,
        }
    }
}

impl ImageRsTranscoder {
    #[must_use]
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Transcoder for ImageRsTranscoder {
    fn to_jpeg(&self, bytes: &[u8], source: PhotoFormat) -> Result<Vec<u8>> {
        let decoded = image_rs::load_from_memory(bytes).map_err(|err| {
            Error::Image(format!("cannot decode {} payload: {err}", source.extension()))
        })?;
        encode_jpeg(&decoded, self.quality)
    }
}

/// Decodes HEVC-coded HEIC/HEIF containers with libheif.
///
/// Payloads libheif rejects are handed to [`ImageRsTranscoder`], which still
/// converts mislabelled JPEG or PNG files.
#[cfg(feature = "heif")]
#[derive(Debug, Clone, Copy)]
pub struct HeifTranscoder {
    fallback: ImageRsTranscoder,
}

#[cfg(feature = "heif")]
impl HeifTranscoder {
    #[must_use]
    pub fn with_quality(quality: u8) -> Self {
        Self {
            fallback: ImageRsTranscoder::with_quality(quality),
        }
    }

    fn decode(bytes: &[u8]) -> Result<DynamicImage> {
        use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

        let heif_error = |err: libheif_rs::HeifError| Error::Image(format!("libheif: {err}"));
        let context = HeifContext::read_from_bytes(bytes).map_err(heif_error)?;
        let handle = context.primary_image_handle().map_err(heif_error)?;
        let image = LibHeif::new()
            .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(heif_error)?;

        let plane = image
            .planes()
            .interleaved
            .ok_or_else(|| Error::Image("libheif returned no interleaved plane".into()))?;
        let (width, height) = (plane.width, plane.height);
        let row = width as usize * 3;
        let mut pixels = Vec::with_capacity(row * height as usize);
        // rows are padded to `stride` bytes
        for line in plane.data.chunks(plane.stride.max(1)).take(height as usize) {
            let line = line
                .get(..row)
                .ok_or_else(|| Error::Image("libheif row shorter than its width".into()))?;
            pixels.extend_from_slice(line);
        }
        image_rs::RgbImage::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| Error::Image("libheif plane does not match its size".into()))
    }
}

#[cfg(feature = "heif")]
impl Transcoder for HeifTranscoder {
    fn to_jpeg(&self, bytes: &[u8], source: PhotoFormat) -> Result<Vec<u8>> {
        match Self::decode(bytes) {
            Ok(decoded) => encode_jpeg(&decoded, self.fallback.quality),
            Err(err) => {
                log::debug!("Falling back to image-rs for {} payload: {err}", source.extension());
                self.fallback.to_jpeg(bytes, source)
            }
        }
    }
}

/// The transcoder intake uses by default: libheif when built with the
/// `heif` feature, image-rs otherwise.
#[must_use]
pub fn default_transcoder(quality: u8) -> Arc<dyn Transcoder> {
    #[cfg(feature = "heif")]
    {
        Arc::new(HeifTranscoder::with_quality(quality))
    }
    #[cfg(not(feature = "heif"))]
    {
        Arc::new(ImageRsTranscoder::with_quality(quality))
    }
}

/// Encodes an image as JPEG, dropping alpha.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
    Ok(out)
}
