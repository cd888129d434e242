// SPDX-License-Identifier: MPL-2.0
//! Photo collection store.
//!
//! The ordered list of photos and their edit state. The store is the only
//! writer of the collection: intake appends through [`PhotoStore::add`], the
//! editor commits through [`PhotoStore::update`], and the compositor reads
//! [`PhotoStore::photos`].

use crate::domain::editing::{EditState, EditStatePatch};
use crate::domain::photo::{PhotoFormat, PhotoId};
use crate::media::preview::{PreviewHandle, PreviewRegistry};
use std::sync::Arc;

/// A validated, normalized photo ready to join the collection.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub file_name: String,
    pub format: PhotoFormat,
    pub bytes: Arc<[u8]>,
    /// Pixel size when the header could be read.
    pub dimensions: Option<(u32, u32)>,
}

/// One photo in the collection.
#[derive(Debug)]
pub struct PhotoEntry {
    id: PhotoId,
    file_name: String,
    format: PhotoFormat,
    bytes: Arc<[u8]>,
    dimensions: Option<(u32, u32)>,
    preview: PreviewHandle,
    state: EditState,
}

impl PhotoEntry {
    #[must_use]
    pub fn id(&self) -> PhotoId {
        self.id
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn format(&self) -> PhotoFormat {
        self.format
    }

    /// Shared handle on the normalized image bytes.
    #[must_use]
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    #[must_use]
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    #[must_use]
    pub fn state(&self) -> &EditState {
        &self.state
    }

    fn release(self) {
        log::debug!("Releasing preview of {}", self.id);
        self.preview.release();
    }
}

/// Bounded, ordered collection of photos.
#[derive(Debug)]
pub struct PhotoStore {
    photos: Vec<PhotoEntry>,
    capacity: usize,
    next_id: u64,
    previews: PreviewRegistry,
}

impl PhotoStore {
    /// Creates an empty store. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize, previews: PreviewRegistry) -> Self {
        Self {
            photos: Vec::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            next_id: 0,
            previews,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Appends photos up to the remaining capacity and returns their new ids.
    ///
    /// Photos beyond the free slots are dropped.
    pub fn add(&mut self, new_photos: impl IntoIterator<Item = NewPhoto>) -> Vec<PhotoId> {
        let mut added = Vec::new();
        let mut dropped = 0_usize;

        for photo in new_photos {
            if self.is_full() {
                dropped += 1;
                continue;
            }
            self.next_id += 1;
            let id = PhotoId::from_raw(self.next_id);
            let preview = self.previews.create(Arc::clone(&photo.bytes), photo.format);
            self.photos.push(PhotoEntry {
                id,
                file_name: photo.file_name,
                format: photo.format,
                bytes: photo.bytes,
                dimensions: photo.dimensions,
                preview,
                state: EditState::default(),
            });
            added.push(id);
        }

        if dropped > 0 {
            log::warn!(
                "Store full ({} photos), dropped {dropped} photo(s)",
                self.capacity
            );
        }
        if !added.is_empty() {
            log::info!("Added {} photo(s), {} slot(s) left", added.len(), self.remaining());
        }
        added
    }

    /// Removes a photo and releases its preview. Returns false if absent.
    pub fn remove(&mut self, id: PhotoId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.photos.remove(index).release();
        log::debug!("Removed {id}");
        true
    }

    /// Merges the fields present in `patch` into a photo's edit state.
    /// Returns false if the photo is absent.
    pub fn update(&mut self, id: PhotoId, patch: EditStatePatch) -> bool {
        let Some(entry) = self.photos.iter_mut().find(|entry| entry.id == id) else {
            log::debug!("Update ignored, {id} is not in the store");
            return false;
        };
        entry.state.apply(patch);
        true
    }

    /// Moves the photo at `from` to index `to`, keeping the others in order.
    /// Out-of-range indices leave the collection untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.photos.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let entry = self.photos.remove(from);
            self.photos.insert(to, entry);
        }
        true
    }

    /// Releases every preview and empties the collection.
    pub fn clear(&mut self) {
        let count = self.photos.len();
        for entry in self.photos.drain(..) {
            entry.release();
        }
        if count > 0 {
            log::info!("Cleared {count} photo(s)");
        }
    }

    // ------------------------------------------------------------------
    // Read model
    // ------------------------------------------------------------------

    #[must_use]
    pub fn photos(&self) -> &[PhotoEntry] {
        &self.photos
    }

    #[must_use]
    pub fn get(&self, id: PhotoId) -> Option<&PhotoEntry> {
        self.photos.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn position(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|entry| entry.id == id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<PhotoId> {
        self.photos.iter().map(PhotoEntry::id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.photos.len())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }
}

impl Drop for PhotoStore {
    fn drop(&mut self) {
        self.clear();
    }
}
