// SPDX-License-Identifier: MPL-2.0
//! Camera capture.
//!
//! The capture hardware sits behind [`CameraDevice`]. A [`CameraSession`]
//! owns the live stream and stops it when a frame has been captured, when the
//! session is closed, or when it is dropped.

use crate::domain::photo::PhotoFormat;
use crate::error::IntakeError;
use crate::intake::Candidate;
use futures_util::future::BoxFuture;

/// A still frame grabbed from a live stream.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub format: PhotoFormat,
}

/// A live video stream from an opened device.
pub trait CameraStream: Send {
    /// Grabs the current frame.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CameraUnavailable`] if the device stopped
    /// delivering frames.
    fn capture(&mut self) -> Result<CapturedFrame, IntakeError>;

    /// Stops every track of the stream. Must be idempotent.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Capture hardware.
pub trait CameraDevice: Send + Sync {
    /// Requests access and starts a stream.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CameraUnavailable`] when permission is denied
    /// or no device is present.
    fn open(&self) -> BoxFuture<'_, Result<Box<dyn CameraStream>, IntakeError>>;
}

/// An open camera, ready to capture one photo.
pub struct CameraSession {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraSession {
    /// Opens the device.
    ///
    /// # Errors
    ///
    /// Propagates the device's [`IntakeError::CameraUnavailable`].
    pub async fn start(device: &dyn CameraDevice) -> Result<Self, IntakeError> {
        match device.open().await {
            Ok(stream) => {
                log::debug!("Camera stream started");
                Ok(Self {
                    stream: Some(stream),
                })
            }
            Err(err) => {
                log::warn!("Camera unavailable: {err}");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stream.as_ref().is_some_and(|stream| stream.is_active())
    }

    /// Captures one frame as an intake candidate and stops the stream.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CameraUnavailable`] if the session is already
    /// closed or the stream fails. The stream is stopped either way.
    pub fn capture(&mut self) -> Result<Candidate, IntakeError> {
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| IntakeError::CameraUnavailable("camera session closed".into()))?;
        let frame = stream.capture();
        stream.stop();
        log::debug!("Camera stream stopped after capture");

        let frame = frame?;
        Ok(Candidate::Memory {
            file_name: format!("camera-capture.{}", frame.format.extension()),
            bytes: frame.bytes,
        })
    }

    /// Stops the stream without capturing.
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::debug!("Camera stream stopped");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("active", &self.is_active())
            .finish()
    }
}
