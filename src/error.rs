// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Image(String),
    Intake(IntakeError),
}

/// Reasons a candidate photo never made it into the collection.
/// Every variant is recoverable at the intake call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The collection has no free slot left.
    CapacityExceeded,

    /// The payload is bigger than the accepted ceiling.
    FileTooLarge { limit_bytes: u64 },

    /// The file extension is not one of the accepted formats.
    UnsupportedFormat { extension: String },

    /// A HEIC/HEIF payload could not be transcoded to a displayable format.
    ConversionFailed(String),

    /// Remote import failed (network error or non-2xx response).
    FetchFailed(String),

    /// Camera permission denied or no capture device present.
    CameraUnavailable(String),

    /// A local file could not be read.
    Unreadable(String),

    /// The batch was cancelled before this candidate finished.
    Cancelled,
}

impl IntakeError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            IntakeError::CapacityExceeded => "error-intake-capacity-exceeded",
            IntakeError::FileTooLarge { .. } => "error-intake-file-too-large",
            IntakeError::UnsupportedFormat { .. } => "error-intake-unsupported-format",
            IntakeError::ConversionFailed(_) => "error-intake-conversion-failed",
            IntakeError::FetchFailed(_) => "error-intake-fetch-failed",
            IntakeError::CameraUnavailable(_) => "error-intake-camera-unavailable",
            IntakeError::Unreadable(_) => "error-intake-unreadable",
            IntakeError::Cancelled => "error-intake-cancelled",
        }
    }
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::CapacityExceeded => write!(f, "No free photo slot left"),
            IntakeError::FileTooLarge { limit_bytes } => {
                write!(
                    f,
                    "File is larger than the {} MB limit",
                    limit_bytes / (1024 * 1024)
                )
            }
            IntakeError::UnsupportedFormat { extension } => {
                if extension.is_empty() {
                    write!(f, "Unsupported file format")
                } else {
                    write!(f, "Unsupported file format: .{}", extension)
                }
            }
            IntakeError::ConversionFailed(msg) => write!(f, "Conversion failed: {}", msg),
            IntakeError::FetchFailed(msg) => write!(f, "Download failed: {}", msg),
            IntakeError::CameraUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            IntakeError::Unreadable(msg) => write!(f, "Cannot read file: {}", msg),
            IntakeError::Cancelled => write!(f, "Upload cancelled"),
        }
    }
}

impl std::error::Error for IntakeError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Image(e) => write!(f, "Image Error: {}", e),
            Error::Intake(e) => write!(f, "Intake Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<IntakeError> for Error {
    fn from(err: IntakeError) -> Self {
        Error::Intake(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
