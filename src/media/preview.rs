// SPDX-License-Identifier: MPL-2.0
//! Tracked preview resources.
//!
//! A [`PreviewHandle`] is the display resource of one photo (or of the editor's
//! working copy). Handles are not `Clone`: each one has a single owner, and the
//! [`PreviewRegistry`] counts how many are alive so tests can assert that
//! removing or clearing photos releases everything.

use crate::domain::photo::PhotoFormat;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Identifier of a preview, usable as a display reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(u64);

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Counters {
    next_id: AtomicU64,
    outstanding: AtomicUsize,
}

/// Issues preview handles and counts the live ones.
///
/// Cloning the registry shares the counters.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    counters: Arc<Counters>,
}

impl PreviewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle over already-normalized image bytes.
    #[must_use]
    pub fn create(&self, bytes: Arc<[u8]>, format: PhotoFormat) -> PreviewHandle {
        let id = PreviewId(self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.counters.outstanding.fetch_add(1, Ordering::SeqCst);
        log::debug!("Created {id} ({} bytes)", bytes.len());
        PreviewHandle {
            id,
            bytes,
            format,
            counters: Arc::clone(&self.counters),
        }
    }

    /// Number of handles created and not yet released.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.counters.outstanding.load(Ordering::SeqCst)
    }
}

/// Exclusively owned display resource.
///
/// Released by [`release`](Self::release) or when dropped.
pub struct PreviewHandle {
    id: PreviewId,
    bytes: Arc<[u8]>,
    format: PhotoFormat,
    counters: Arc<Counters>,
}

impl PreviewHandle {
    #[must_use]
    pub fn id(&self) -> PreviewId {
        self.id
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn format(&self) -> PhotoFormat {
        self.format
    }

    /// Releases the resource now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.counters.outstanding.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Released {}", self.id);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
