// SPDX-License-Identifier: MPL-2.0
//! Application context.
//!
//! [`Studio`] owns everything a composition session needs: configuration,
//! the photo store, the preview registry, the upload board and the intake
//! pipeline. Callers construct one explicitly and pass it around.

use crate::compositor::{self, GridLayout, GridSlot, SheetOptions};
use crate::config::Config;
use crate::domain::editing::Size;
use crate::domain::photo::PhotoId;
use crate::editor::{EditorOptions, EditorSession};
use crate::error::{IntakeError, Result};
use crate::intake::{
    CameraSession, CancellationToken, Candidate, IntakePipeline, IntakeReport, UploadBoard,
};
use crate::media::preview::PreviewRegistry;
use crate::store::PhotoStore;
use image_rs::DynamicImage;

#[derive(Debug)]
pub struct Studio {
    config: Config,
    previews: PreviewRegistry,
    store: PhotoStore,
    board: UploadBoard,
    pipeline: IntakePipeline,
}

impl Studio {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let previews = PreviewRegistry::new();
        let store = PhotoStore::new(config.max_photos(), previews.clone());
        let pipeline = IntakePipeline::new(&config);
        log::debug!("Studio ready with {} photo slot(s)", store.capacity());
        Self {
            config,
            previews,
            store,
            board: UploadBoard::new(),
            pipeline,
        }
    }

    /// Replaces the intake pipeline, e.g. to plug in a fetcher or transcoder.
    #[must_use]
    pub fn with_intake(mut self, configure: impl FnOnce(IntakePipeline) -> IntakePipeline) -> Self {
        let pipeline = std::mem::replace(&mut self.pipeline, IntakePipeline::new(&self.config));
        self.pipeline = configure(pipeline);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PhotoStore {
        &mut self.store
    }

    #[must_use]
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    #[must_use]
    pub fn board(&self) -> &UploadBoard {
        &self.board
    }

    #[must_use]
    pub fn pipeline(&self) -> &IntakePipeline {
        &self.pipeline
    }

    /// Runs a batch of candidates into the store.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CapacityExceeded`] when no slot is free.
    pub async fn import(
        &mut self,
        candidates: Vec<Candidate>,
        token: &CancellationToken,
    ) -> std::result::Result<IntakeReport, IntakeError> {
        self.pipeline
            .run(candidates, &mut self.store, &self.board, token)
            .await
    }

    /// Captures one frame from an open camera and imports it.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::CapacityExceeded`] without touching the camera
    /// when no slot is free, so the session stays open. Returns
    /// [`IntakeError::CameraUnavailable`] if the capture fails. Once a frame
    /// is taken the stream is stopped.
    pub async fn capture(
        &mut self,
        camera: &mut CameraSession,
        token: &CancellationToken,
    ) -> std::result::Result<IntakeReport, IntakeError> {
        if self.store.is_full() {
            return Err(IntakeError::CapacityExceeded);
        }
        let candidate = camera.capture()?;
        self.import(vec![candidate], token).await
    }

    /// Opens an editor on a photo displayed at `viewport`.
    #[must_use]
    pub fn open_editor(&self, id: PhotoId, viewport: Size) -> Option<EditorSession> {
        let entry = self.store.get(id)?;
        Some(EditorSession::open(
            entry,
            viewport,
            &self.previews,
            EditorOptions::from(&self.config),
        ))
    }

    /// Saves an editor session into the store. Returns false if the photo
    /// was removed while the editor was open.
    pub fn commit_editor(&mut self, session: EditorSession) -> bool {
        let (id, patch) = session.save();
        self.store.update(id, patch)
    }

    #[must_use]
    pub fn grid(&self) -> Vec<GridSlot> {
        compositor::render_grid(self.store.photos(), self.store.capacity())
    }

    #[must_use]
    pub fn layout(&self) -> GridLayout {
        GridLayout::for_capacity(self.store.capacity())
    }

    /// Rasterizes the current grid.
    ///
    /// # Errors
    ///
    /// Returns an error if a photo cannot be decoded.
    pub fn render_sheet(&self, options: &SheetOptions) -> Result<DynamicImage> {
        compositor::render_sheet(self.store.photos(), self.store.capacity(), options)
    }

    /// Drops every photo and upload task, keeping the configuration.
    pub fn reset(&mut self) {
        self.store.clear();
        self.board.clear();
        log::info!("Studio reset");
    }
}
