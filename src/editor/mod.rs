// SPDX-License-Identifier: MPL-2.0
//! Photo editor session with adjustments, presets, rotate, flip and crop.
//!
//! The editor operates on a copy of a photo's edit state and only touches the
//! store when the caller commits the result of [`EditorSession::save`].
//! Closing without saving discards everything.
//!
//! Continuous inputs (slider drags, crop drags) record one history entry per
//! gesture; discrete actions record one entry each. Any pending gesture is
//! committed before a discrete action, undo or redo.

pub mod crop;
pub mod history;

#[cfg(test)]
mod tests;

pub use crop::{AspectRatio, CropHandle, CropState};
pub use history::EditHistory;

use crate::config::defaults::{HISTORY_LIMIT, MIN_CROP_SIZE};
use crate::config::Config;
use crate::domain::editing::{AdjustmentKind, EditState, EditStatePatch, Point, Size};
use crate::domain::photo::{PhotoFormat, PhotoId};
use crate::error::Result;
use crate::media::filter::{build_render_filter, find_preset};
use crate::media::image_transform::apply_edit_state;
use crate::media::preview::{PreviewHandle, PreviewId, PreviewRegistry};
use crate::media::transcode::encode_jpeg;
use crate::store::PhotoEntry;
use std::sync::Arc;

/// JPEG quality of in-editor previews.
const PREVIEW_JPEG_QUALITY: u8 = 85;

/// Editor tuning resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorOptions {
    pub history_limit: usize,
    pub min_crop_size: f32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            min_crop_size: MIN_CROP_SIZE,
        }
    }
}

impl From<&Config> for EditorOptions {
    fn from(config: &Config) -> Self {
        Self {
            history_limit: config.history_limit(),
            min_crop_size: config.min_crop_size(),
        }
    }
}

/// The continuous input currently in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    None,
    Slider,
    Crop,
}

/// Local editing state for one photo.
pub struct EditorSession {
    photo_id: PhotoId,
    source: Arc<[u8]>,
    /// Viewport of the unrotated image.
    base_viewport: Size,
    state: EditState,
    original: EditState,
    history: EditHistory,
    crop: CropState,
    gesture: Gesture,
    options: EditorOptions,
    previews: PreviewRegistry,
    preview: Option<PreviewHandle>,
}

impl EditorSession {
    /// Opens an editor on a photo.
    ///
    /// `viewport` is the size the photo is displayed at in its current
    /// orientation.
    #[must_use]
    pub fn open(
        entry: &PhotoEntry,
        viewport: Size,
        previews: &PreviewRegistry,
        options: EditorOptions,
    ) -> Self {
        let state = entry.state().clone();
        let base_viewport = if state.rotation.swaps_dimensions() {
            viewport.transposed()
        } else {
            viewport
        };
        let crop = CropState::from_crop(viewport, state.crop, options.min_crop_size);
        log::debug!("Editor opened on {}", entry.id());

        Self {
            photo_id: entry.id(),
            source: Arc::clone(entry.bytes()),
            base_viewport,
            history: EditHistory::new(state.clone(), options.history_limit),
            original: state.clone(),
            state,
            crop,
            gesture: Gesture::None,
            options,
            previews: previews.clone(),
            preview: None,
        }
    }

    // ------------------------------------------------------------------
    // Read model
    // ------------------------------------------------------------------

    #[must_use]
    pub fn photo_id(&self) -> PhotoId {
        self.photo_id
    }

    /// Live edit state, including uncommitted gesture values.
    #[must_use]
    pub fn state(&self) -> &EditState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    #[must_use]
    pub fn crop(&self) -> &CropState {
        &self.crop
    }

    /// Viewport of the photo as currently displayed.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.crop.viewport()
    }

    /// Render filter of the live state.
    #[must_use]
    pub fn render_filter(&self) -> String {
        build_render_filter(&self.state.adjustments, &self.state.filter_preset_id)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.gesture != Gesture::None || self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.gesture == Gesture::None && self.history.can_redo()
    }

    /// Returns true if saving would change the photo.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.state != self.original
    }

    #[must_use]
    pub fn preview_id(&self) -> Option<PreviewId> {
        self.preview.as_ref().map(PreviewHandle::id)
    }

    // ------------------------------------------------------------------
    // Sliders
    // ------------------------------------------------------------------

    /// Moves a slider. The value is live but not recorded until
    /// [`release_adjustment`](Self::release_adjustment).
    pub fn set_adjustment(&mut self, kind: AdjustmentKind, value: f32) -> f32 {
        if self.gesture == Gesture::Crop {
            self.commit_gesture();
        }
        self.gesture = Gesture::Slider;
        self.state.adjustments.set(kind, value)
    }

    /// Ends a slider drag. Returns true if a history entry was recorded.
    pub fn release_adjustment(&mut self) -> bool {
        if self.gesture != Gesture::Slider {
            return false;
        }
        self.commit_gesture()
    }

    // ------------------------------------------------------------------
    // Discrete actions
    // ------------------------------------------------------------------

    /// Applies a preset by id; an empty id clears it. Unknown ids are ignored.
    pub fn apply_preset(&mut self, preset_id: &str) -> bool {
        let id = if preset_id.trim().is_empty() {
            String::new()
        } else if let Some(preset) = find_preset(preset_id) {
            preset.id.to_string()
        } else {
            log::warn!("Ignoring unknown filter preset '{preset_id}'");
            return false;
        };
        self.discrete(|session| session.state.filter_preset_id = id)
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.discrete(|session| {
            session.state.rotation = session.state.rotation.rotate_clockwise();
            session.state.crop = session.state.crop.map(|rect| rect.rotated_clockwise());
            session.rebuild_crop();
        })
    }

    pub fn rotate_counterclockwise(&mut self) -> bool {
        self.discrete(|session| {
            session.state.rotation = session.state.rotation.rotate_counterclockwise();
            session.state.crop = session
                .state
                .crop
                .map(|rect| rect.rotated_counterclockwise());
            session.rebuild_crop();
        })
    }

    /// Mirrors the photo left-to-right in its own frame.
    pub fn flip_horizontal(&mut self) -> bool {
        self.discrete(|session| {
            session.state.flip_horizontal = !session.state.flip_horizontal;
            // On a quarter-turned view the photo's horizontal axis is vertical.
            let swapped = session.state.rotation.swaps_dimensions();
            session.state.crop = session.state.crop.map(|rect| {
                if swapped {
                    rect.mirrored_vertically()
                } else {
                    rect.mirrored_horizontally()
                }
            });
            session.rebuild_crop_keep_ratio();
        })
    }

    /// Mirrors the photo top-to-bottom in its own frame.
    pub fn flip_vertical(&mut self) -> bool {
        self.discrete(|session| {
            session.state.flip_vertical = !session.state.flip_vertical;
            let swapped = session.state.rotation.swaps_dimensions();
            session.state.crop = session.state.crop.map(|rect| {
                if swapped {
                    rect.mirrored_horizontally()
                } else {
                    rect.mirrored_vertically()
                }
            });
            session.rebuild_crop_keep_ratio();
        })
    }

    /// Switches the crop aspect ratio, reshaping the crop.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) -> bool {
        self.discrete(|session| {
            session.crop.set_ratio(ratio);
            let crop = session.crop.normalized();
            session.state.set_crop(crop);
        })
    }

    /// Drops the crop and the ratio lock.
    pub fn clear_crop(&mut self) -> bool {
        self.discrete(|session| {
            session.crop.reset();
            session.state.set_crop(None);
        })
    }

    /// Restores every field to its neutral value.
    pub fn reset(&mut self) -> bool {
        self.discrete(|session| {
            session.state = EditState::default();
            session.rebuild_crop();
        })
    }

    fn discrete(&mut self, action: impl FnOnce(&mut Self)) -> bool {
        self.commit_gesture();
        action(self);
        self.history.push(self.state.clone())
    }

    // ------------------------------------------------------------------
    // Crop gestures
    // ------------------------------------------------------------------

    /// Starts a crop drag on the handle under `point`, if any.
    pub fn pointer_down(&mut self, point: Point) -> Option<CropHandle> {
        self.commit_gesture();
        let handle = self.crop.pointer_down(point)?;
        self.gesture = Gesture::Crop;
        Some(handle)
    }

    /// Starts a crop drag on a known handle.
    pub fn begin_drag(&mut self, handle: CropHandle, point: Point) {
        self.commit_gesture();
        self.crop.begin_drag(handle, point);
        self.gesture = Gesture::Crop;
    }

    /// Updates the live crop. Returns true if the rectangle moved.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        if self.gesture != Gesture::Crop {
            return false;
        }
        let moved = self.crop.pointer_move(point);
        if moved {
            let crop = self.crop.normalized();
            self.state.set_crop(crop);
        }
        moved
    }

    /// Ends the crop drag. Returns true if a history entry was recorded.
    pub fn pointer_up(&mut self) -> bool {
        if self.gesture != Gesture::Crop {
            return false;
        }
        self.commit_gesture()
    }

    fn commit_gesture(&mut self) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::None) {
            Gesture::None => false,
            Gesture::Slider => self.history.push(self.state.clone()),
            Gesture::Crop => {
                if !self.crop.pointer_up() {
                    return false;
                }
                let crop = self.crop.normalized();
                self.state.set_crop(crop);
                self.history.push(self.state.clone())
            }
        }
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.commit_gesture();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.commit_gesture();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: EditState) {
        self.state = snapshot;
        self.rebuild_crop_keep_ratio();
    }

    /// Rebuilds the crop tool from the live state, unlocking the ratio.
    fn rebuild_crop(&mut self) {
        let viewport = self.displayed_viewport();
        self.crop = CropState::from_crop(viewport, self.state.crop, self.options.min_crop_size);
    }

    /// Rebuilds the crop tool from the live state. The ratio lock survives
    /// when the viewport keeps its orientation and the rebuilt rectangle
    /// still has the locked proportions; the rectangle is not reshaped.
    fn rebuild_crop_keep_ratio(&mut self) {
        let ratio = self.crop.ratio();
        let viewport = self.crop.viewport();
        self.rebuild_crop();
        if self.crop.viewport() == viewport && self.crop.fits_ratio(ratio) {
            self.crop.lock_ratio(ratio);
        }
    }

    fn displayed_viewport(&self) -> Size {
        if self.state.rotation.swaps_dimensions() {
            self.base_viewport.transposed()
        } else {
            self.base_viewport
        }
    }

    // ------------------------------------------------------------------
    // Preview / lifecycle
    // ------------------------------------------------------------------

    /// Flattens the live state into a new preview, releasing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo cannot be decoded or the preview encoded.
    pub fn render_preview(&mut self) -> Result<PreviewId> {
        let decoded = image_rs::load_from_memory(&self.source)?;
        let flattened = apply_edit_state(&decoded, &self.state);
        let bytes = encode_jpeg(&flattened, PREVIEW_JPEG_QUALITY)?;
        let handle = self.previews.create(Arc::from(bytes), PhotoFormat::Jpeg);
        let id = handle.id();
        if let Some(previous) = self.preview.replace(handle) {
            previous.release();
        }
        Ok(id)
    }

    /// Closes the editor, returning the patch to commit with
    /// [`PhotoStore::update`](crate::store::PhotoStore::update).
    #[must_use]
    pub fn save(mut self) -> (PhotoId, EditStatePatch) {
        self.commit_gesture();
        self.release_preview();
        log::debug!("Editor saved {}", self.photo_id);
        (self.photo_id, EditStatePatch::from(self.state.clone()))
    }

    /// Closes the editor, discarding local changes.
    pub fn cancel(mut self) {
        self.release_preview();
        log::debug!("Editor closed on {} without saving", self.photo_id);
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("photo_id", &self.photo_id)
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("gesture", &self.gesture)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}
