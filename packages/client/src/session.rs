//! Client-side state for one upload session: the file queue, the cached
//! category list and user notifications.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info};
use uuid::Uuid;

use crate::dropzone::SelectedFile;
use crate::error::ClientError;
use crate::models::Category;

/// Per-file pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Queued,
    Optimizing,
    Uploading { progress: u8 },
    Uploaded,
    Error,
    Deleting,
}

impl UploadState {
    pub fn can_transition_to(&self, next: &UploadState) -> bool {
        use UploadState::*;
        match (self, next) {
            (Queued, Optimizing) => true,
            (Optimizing, Uploading { progress: 0 }) | (Optimizing, Error) => true,
            (Uploading { progress: from }, Uploading { progress: to }) => to >= from,
            (Uploading { .. }, Uploaded) | (Uploading { .. }, Error) => true,
            (Uploaded, Deleting) => true,
            // A failed delete leaves the file in view.
            (Deleting, Uploaded) => true,
            _ => false,
        }
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadState::Queued => write!(f, "queued"),
            UploadState::Optimizing => write!(f, "optimizing"),
            UploadState::Uploading { progress } => write!(f, "uploading ({progress}%)"),
            UploadState::Uploaded => write!(f, "uploaded"),
            UploadState::Error => write!(f, "error"),
            UploadState::Deleting => write!(f, "deleting"),
        }
    }
}

/// One file moving through the pipeline.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub id: Uuid,
    pub original_name: String,
    /// The file as it will be (or was) uploaded; replaced after optimization.
    pub file: SelectedFile,
    /// Categories selected when the file was queued.
    pub category_ids: Vec<i32>,
    pub state: UploadState,
    /// Set when the last operation on this entry failed.
    pub error: bool,
    pub key: Option<String>,
    pub image_url: Option<String>,
    pub image_id: Option<i32>,
}

impl UploadEntry {
    pub fn progress(&self) -> u8 {
        match self.state {
            UploadState::Uploading { progress } => progress,
            UploadState::Uploaded | UploadState::Deleting => 100,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct SessionState {
    entries: Vec<UploadEntry>,
    categories: Vec<Category>,
    selected_category_ids: Vec<i32>,
    notifications: Vec<Notification>,
}

/// Shared handle to a session. Clones refer to the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Queue

    /// Add a file in the `queued` state, tagged with the current category selection.
    pub fn enqueue(&self, file: SelectedFile) -> Uuid {
        let mut state = self.lock();
        let entry = UploadEntry {
            id: Uuid::new_v4(),
            original_name: file.name.clone(),
            file,
            category_ids: state.selected_category_ids.clone(),
            state: UploadState::Queued,
            error: false,
            key: None,
            image_url: None,
            image_id: None,
        };
        let id = entry.id;
        state.entries.push(entry);
        id
    }

    pub fn entry(&self, id: Uuid) -> Option<UploadEntry> {
        self.lock().entries.iter().find(|e| e.id == id).cloned()
    }

    pub fn entries(&self) -> Vec<UploadEntry> {
        self.lock().entries.clone()
    }

    /// Move an entry to `next`, rejecting transitions the pipeline never makes.
    pub fn transition(&self, id: Uuid, next: UploadState) -> Result<(), ClientError> {
        self.update(id, |entry| {
            if !entry.state.can_transition_to(&next) {
                return Err(ClientError::InvalidTransition {
                    from: entry.state,
                    to: next,
                });
            }
            entry.state = next;
            entry.error = matches!(next, UploadState::Error);
            Ok(())
        })
    }

    /// Apply `f` to the entry with `id`.
    pub fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut UploadEntry) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut state = self.lock();
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ClientError::UnknownEntry(id))?;
        f(entry)
    }

    pub fn remove(&self, id: Uuid) -> Option<UploadEntry> {
        let mut state = self.lock();
        let pos = state.entries.iter().position(|e| e.id == id)?;
        Some(state.entries.remove(pos))
    }

    // Categories

    pub fn set_categories(&self, categories: Vec<Category>) {
        let mut state = self.lock();
        // Drop selections that no longer exist.
        state
            .selected_category_ids
            .retain(|id| categories.iter().any(|c| c.id == *id));
        state.categories = categories;
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    /// Check or uncheck a category for subsequently queued files.
    pub fn select_category(&self, id: i32, selected: bool) {
        let mut state = self.lock();
        if selected {
            if !state.selected_category_ids.contains(&id) {
                state.selected_category_ids.push(id);
            }
        } else {
            state.selected_category_ids.retain(|c| *c != id);
        }
    }

    pub fn selected_category_ids(&self) -> Vec<i32> {
        self.lock().selected_category_ids.clone()
    }

    // Notifications

    pub fn notify_success(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push_notification(NotificationKind::Success, message);
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push_notification(NotificationKind::Error, message);
    }

    fn push_notification(&self, kind: NotificationKind, message: String) {
        self.lock()
            .notifications
            .push(Notification { kind, message });
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Take and clear pending notifications.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }
}
