// SPDX-License-Identifier: MPL-2.0
//! Per-file upload progress, observable through a watch channel.

use crate::domain::photo::PhotoId;
use crate::error::IntakeError;
use crate::media::format_file_size;
use crate::media::preview::PreviewId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Identifier of one upload task on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Done,
    Error,
}

/// Display record of one file going through intake.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    pub id: TaskId,
    pub name: String,
    /// Human-readable size, e.g. `"1.50 MB"`.
    pub size_label: String,
    /// 0..=100, never decreases.
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    pub preview: Option<PreviewId>,
    pub photo_id: Option<PhotoId>,
}

impl UploadTask {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status != UploadStatus::Uploading
    }
}

/// Shared list of upload tasks.
///
/// Cloning yields another handle on the same board. Observers call
/// [`UploadBoard::subscribe`] and receive a fresh snapshot on every change.
#[derive(Debug, Clone)]
pub struct UploadBoard {
    sender: Arc<watch::Sender<Vec<UploadTask>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for UploadBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadBoard {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            sender: Arc::new(sender),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Registers a new task at 0% and returns its id.
    pub fn begin(&self, name: &str, byte_size: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = UploadTask {
            id,
            name: name.to_string(),
            size_label: byte_size.map(format_file_size).unwrap_or_default(),
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
            preview: None,
            photo_id: None,
        };
        self.sender.send_modify(|tasks| tasks.push(task));
        id
    }

    /// Raises the progress of a running task. Lower values are ignored.
    pub fn advance(&self, id: TaskId, progress: u8) {
        self.modify(id, |task| {
            if task.status == UploadStatus::Uploading {
                task.progress = task.progress.max(progress.min(100));
            }
        });
    }

    /// Renames a task once the final file name is known.
    pub fn rename(&self, id: TaskId, name: &str, byte_size: u64) {
        self.modify(id, |task| {
            task.name = name.to_string();
            task.size_label = format_file_size(byte_size);
        });
    }

    /// Marks a task done at 100%.
    pub fn complete(&self, id: TaskId, photo_id: PhotoId, preview: PreviewId) {
        self.modify(id, |task| {
            task.progress = 100;
            task.status = UploadStatus::Done;
            task.photo_id = Some(photo_id);
            task.preview = Some(preview);
        });
    }

    /// Marks a task failed. Progress is left where it stopped.
    pub fn fail(&self, id: TaskId, error: &IntakeError) {
        self.modify(id, |task| {
            task.status = UploadStatus::Error;
            task.error = Some(error.to_string());
        });
    }

    /// Snapshot of every task in registration order.
    #[must_use]
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<UploadTask> {
        self.sender.borrow().iter().find(|task| task.id == id).cloned()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadTask>> {
        self.sender.subscribe()
    }

    /// Drops every task that is no longer uploading.
    pub fn clear_finished(&self) {
        self.sender.send_if_modified(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| !task.is_finished());
            tasks.len() != before
        });
    }

    pub fn clear(&self) {
        self.sender.send_if_modified(|tasks| {
            let had_tasks = !tasks.is_empty();
            tasks.clear();
            had_tasks
        });
    }

    fn modify(&self, id: TaskId, update: impl FnOnce(&mut UploadTask)) {
        self.sender.send_if_modified(|tasks| {
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return false;
            };
            let before = task.clone();
            update(task);
            *task != before
        });
    }
}
