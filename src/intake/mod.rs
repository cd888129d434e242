// SPDX-License-Identifier: MPL-2.0
//! Intake pipeline: turns picked files, camera frames and remote URLs into
//! validated, normalized photos in the store.
//!
//! A batch goes through these stages:
//!
//! 1. capacity check (the whole batch is refused when no slot is free, and
//!    truncated to the free slots otherwise)
//! 2. acquisition (file read, download or in-memory bytes)
//! 3. validation (size ceiling, accepted extensions)
//! 4. normalization (HEIC/HEIF transcoded to JPEG on the blocking pool)
//! 5. commit to the store
//!
//! Candidates run concurrently and fail independently. Progress for each one
//! is published on the [`UploadBoard`].

pub mod camera;
pub mod fetch;
pub mod upload;

use crate::config::{Config, IntakeOrder};
use crate::domain::photo::{file_extension, with_extension, PhotoFormat, PhotoId};
use crate::error::IntakeError;
use crate::media::{self, Transcoder};
use crate::store::{NewPhoto, PhotoStore};
use futures_util::stream::{FuturesOrdered, FuturesUnordered};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use camera::{CameraDevice, CameraSession, CameraStream, CapturedFrame};
pub use fetch::{FetchedFile, Fetcher, HttpFetcher};
pub use upload::{TaskId, UploadBoard, UploadStatus, UploadTask};

/// Cancellation token for an intake batch.
pub type CancellationToken = Arc<AtomicBool>;

/// Creates a token in the non-cancelled state.
#[must_use]
pub fn cancellation_token() -> CancellationToken {
    Arc::new(AtomicBool::new(false))
}

/// Checks if the operation has been cancelled.
#[must_use]
pub fn is_cancelled(token: &CancellationToken) -> bool {
    token.load(Ordering::SeqCst)
}

fn ensure_live(token: &CancellationToken) -> Result<(), IntakeError> {
    if is_cancelled(token) {
        Err(IntakeError::Cancelled)
    } else {
        Ok(())
    }
}

/// One item offered to intake.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// A local file (picker, drag-drop, command line).
    Path(PathBuf),
    /// Bytes already in memory, e.g. a camera frame.
    Memory { file_name: String, bytes: Vec<u8> },
    /// A remote photo to download first.
    Url(String),
}

impl Candidate {
    /// Name shown on the upload board before the file is acquired.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Candidate::Path(path) => path_file_name(path),
            Candidate::Memory { file_name, .. } => file_name.clone(),
            Candidate::Url(url) => url.clone(),
        }
    }

    fn known_size(&self) -> Option<u64> {
        match self {
            Candidate::Memory { bytes, .. } => Some(bytes.len() as u64),
            Candidate::Path(_) | Candidate::Url(_) => None,
        }
    }
}

fn path_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Ids of the photos added, in store order.
    pub added: Vec<PhotoId>,
    /// Rejected candidates with the reason.
    pub failed: Vec<(String, IntakeError)>,
    /// Candidates beyond the free slots, never processed.
    pub skipped: usize,
}

/// Validates and normalizes candidates before they reach the store.
pub struct IntakePipeline {
    transcoder: Arc<dyn Transcoder>,
    fetcher: Option<Arc<dyn Fetcher>>,
    max_file_size: u64,
    accepted_extensions: Vec<String>,
    order: IntakeOrder,
}

impl IntakePipeline {
    /// Pipeline using the default transcoder and no remote fetcher.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            transcoder: media::default_transcoder(config.jpeg_quality()),
            fetcher: None,
            max_file_size: config.max_file_size_bytes(),
            accepted_extensions: config.accepted_extensions(),
            order: config.intake_order(),
        }
    }

    #[must_use]
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: IntakeOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn order(&self) -> IntakeOrder {
        self.order
    }

    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Checks a file against the size ceiling and the accepted formats.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::FileTooLarge`] or
    /// [`IntakeError::UnsupportedFormat`].
    pub fn validate(&self, file_name: &str, byte_size: u64) -> Result<PhotoFormat, IntakeError> {
        if byte_size > self.max_file_size {
            return Err(IntakeError::FileTooLarge {
                limit_bytes: self.max_file_size,
            });
        }

        let extension = file_extension(file_name).unwrap_or_default();
        if !self.accepted_extensions.iter().any(|ext| *ext == extension) {
            return Err(IntakeError::UnsupportedFormat { extension });
        }
        PhotoFormat::from_extension(&extension).ok_or(IntakeError::UnsupportedFormat { extension })
    }

    /// Runs a batch into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CapacityExceeded`] without touching anything
    /// when the store has no free slot. Per-file failures are reported in the
    /// [`IntakeReport`] and on the board instead.
    pub async fn run(
        &self,
        mut candidates: Vec<Candidate>,
        store: &mut PhotoStore,
        board: &UploadBoard,
        token: &CancellationToken,
    ) -> Result<IntakeReport, IntakeError> {
        let remaining = store.remaining();
        if remaining == 0 {
            log::warn!(
                "Refusing batch of {} file(s): store is full",
                candidates.len()
            );
            return Err(IntakeError::CapacityExceeded);
        }

        let mut report = IntakeReport {
            skipped: candidates.len().saturating_sub(remaining),
            ..IntakeReport::default()
        };
        if report.skipped > 0 {
            log::info!(
                "Only {remaining} slot(s) free, skipping {} file(s)",
                report.skipped
            );
            candidates.truncate(remaining);
        }

        let jobs = candidates.into_iter().map(move |candidate| {
            let task = board.begin(&candidate.display_name(), candidate.known_size());
            async move { (task, self.prepare(candidate, board, task, token).await) }
        });

        match self.order {
            IntakeOrder::Completion => {
                let mut pending: FuturesUnordered<_> = jobs.collect();
                while let Some((task, result)) = pending.next().await {
                    Self::commit(task, result, store, board, token, &mut report);
                }
            }
            IntakeOrder::Submission => {
                let mut pending: FuturesOrdered<_> = jobs.collect();
                while let Some((task, result)) = pending.next().await {
                    Self::commit(task, result, store, board, token, &mut report);
                }
            }
        }

        log::info!(
            "Intake finished: {} added, {} failed, {} skipped",
            report.added.len(),
            report.failed.len(),
            report.skipped
        );
        Ok(report)
    }

    async fn prepare(
        &self,
        candidate: Candidate,
        board: &UploadBoard,
        task: TaskId,
        token: &CancellationToken,
    ) -> Result<NewPhoto, IntakeError> {
        ensure_live(token)?;
        let (file_name, bytes) = self.acquire(candidate).await?;
        board.rename(task, &file_name, bytes.len() as u64);
        board.advance(task, 30);

        ensure_live(token)?;
        let format = self.validate(&file_name, bytes.len() as u64)?;
        board.advance(task, 50);

        let (file_name, format, bytes) = if format.is_displayable() {
            (file_name, format, bytes)
        } else {
            let jpeg = self.transcode(&file_name, format, bytes).await?;
            let renamed = with_extension(&file_name, PhotoFormat::Jpeg.extension());
            log::info!("Converted {file_name} to {renamed}");
            board.rename(task, &renamed, jpeg.len() as u64);
            (renamed, PhotoFormat::Jpeg, jpeg)
        };
        board.advance(task, 80);

        ensure_live(token)?;
        let dimensions = media::image_dimensions(&bytes);
        board.advance(task, 90);

        Ok(NewPhoto {
            file_name,
            format,
            bytes: Arc::from(bytes),
            dimensions,
        })
    }

    async fn acquire(&self, candidate: Candidate) -> Result<(String, Vec<u8>), IntakeError> {
        match candidate {
            Candidate::Memory { file_name, bytes } => Ok((file_name, bytes)),
            Candidate::Path(path) => {
                let file_name = path_file_name(&path);
                let limit_bytes = self.max_file_size;
                let bytes = tokio::task::spawn_blocking(move || {
                    let size = std::fs::metadata(&path)
                        .map_err(|e| IntakeError::Unreadable(format!("{}: {e}", path.display())))?
                        .len();
                    if size > limit_bytes {
                        return Err(IntakeError::FileTooLarge { limit_bytes });
                    }
                    std::fs::read(&path)
                        .map_err(|e| IntakeError::Unreadable(format!("{}: {e}", path.display())))
                })
                .await
                .map_err(|e| IntakeError::Unreadable(e.to_string()))??;
                Ok((file_name, bytes))
            }
            Candidate::Url(url) => {
                let fetcher = self
                    .fetcher
                    .as_ref()
                    .ok_or_else(|| IntakeError::FetchFailed("remote import is disabled".into()))?;
                let fetched = fetcher.fetch(&url, self.max_file_size).await?;
                Ok((fetched.file_name, fetched.bytes))
            }
        }
    }

    async fn transcode(
        &self,
        file_name: &str,
        format: PhotoFormat,
        bytes: Vec<u8>,
    ) -> Result<Vec<u8>, IntakeError> {
        let transcoder = Arc::clone(&self.transcoder);
        let result = tokio::task::spawn_blocking(move || transcoder.to_jpeg(&bytes, format))
            .await
            .map_err(|e| IntakeError::ConversionFailed(e.to_string()))?;

        result.map_err(|e| {
            log::warn!("Cannot convert {file_name}: {e}");
            IntakeError::ConversionFailed(e.to_string())
        })
    }

    fn commit(
        task: TaskId,
        result: Result<NewPhoto, IntakeError>,
        store: &mut PhotoStore,
        board: &UploadBoard,
        token: &CancellationToken,
        report: &mut IntakeReport,
    ) {
        let outcome = result.and_then(|photo| {
            ensure_live(token)?;
            let id = store
                .add([photo])
                .first()
                .copied()
                .ok_or(IntakeError::CapacityExceeded)?;
            Ok(id)
        });

        match outcome {
            Ok(id) => {
                if let Some(entry) = store.get(id) {
                    board.complete(task, id, entry.preview().id());
                }
                report.added.push(id);
            }
            Err(err) => {
                let name = board.get(task).map(|t| t.name).unwrap_or_default();
                log::warn!("Rejected {name}: {err}");
                board.fail(task, &err);
                report.failed.push((name, err));
            }
        }
    }
}

impl std::fmt::Debug for IntakePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakePipeline")
            .field("max_file_size", &self.max_file_size)
            .field("accepted_extensions", &self.accepted_extensions)
            .field("order", &self.order)
            .field("remote", &self.fetcher.is_some())
            .finish_non_exhaustive()
    }
}
