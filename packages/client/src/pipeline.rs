//! Per-file upload pipeline: optimize, presign, PUT, and delete.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::api::MediaBackend;
use crate::dropzone::{BatchOutcome, SelectedFile, accept_batch, accept_paths};
use crate::error::ClientError;
use crate::models::UploadRequest;
use crate::optimize::{MAX_WIDTH, optimize_in_background};
use crate::session::{Session, UploadState};

/// Drives files from the session queue to the object store.
pub struct Uploader<B> {
    backend: Arc<B>,
    session: Session,
    max_width: u32,
}

impl<B> Clone for Uploader<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            session: self.session.clone(),
            max_width: self.max_width,
        }
    }
}

impl<B: MediaBackend + 'static> Uploader<B> {
    pub fn new(backend: Arc<B>, session: Session) -> Self {
        Self {
            backend,
            session,
            max_width: MAX_WIDTH,
        }
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch categories into the session cache.
    pub async fn refresh_categories(&self) -> Result<(), ClientError> {
        match self.backend.list_categories().await {
            Ok(categories) => {
                self.session.set_categories(categories);
                Ok(())
            }
            Err(e) => {
                self.session
                    .notify_error("Failed to load categories for selection.");
                Err(e)
            }
        }
    }

    /// Apply the batch acceptance rules and queue the accepted files.
    ///
    /// Each distinct rejection reason produces one error notification.
    pub fn enqueue(&self, files: Vec<SelectedFile>) -> Vec<Uuid> {
        self.enqueue_outcome(accept_batch(files))
    }

    fn enqueue_outcome(&self, outcome: BatchOutcome) -> Vec<Uuid> {
        for notice in outcome.notices() {
            self.session.notify_error(notice);
        }
        outcome
            .accepted
            .into_iter()
            .map(|file| self.session.enqueue(file))
            .collect()
    }

    /// Queue a selection and run every accepted file to completion.
    pub async fn upload_batch(&self, files: Vec<SelectedFile>) -> Vec<Uuid> {
        let ids = self.enqueue(files);
        self.process(&ids).await;
        ids
    }

    /// Like [`Uploader::upload_batch`] for files on disk. Rejected files are not read.
    pub async fn upload_paths(&self, paths: &[PathBuf]) -> Result<Vec<Uuid>, ClientError> {
        let ids = self.enqueue_outcome(accept_paths(paths).await?);
        self.process(&ids).await;
        Ok(ids)
    }

    /// Run each queued file on its own task. A failure only affects its own entry.
    pub async fn process(&self, ids: &[Uuid]) {
        let tasks = ids.iter().map(|&id| {
            let uploader = self.clone();
            tokio::spawn(async move { uploader.run(id).await })
        });

        for (id, joined) in ids.iter().zip(join_all(tasks).await) {
            if let Err(e) = joined {
                warn!(%id, "Upload task aborted: {}", e);
                let _ = self.session.update(*id, |entry| {
                    entry.error = true;
                    Ok(())
                });
            }
        }
    }

    /// Take one queued file through optimization and upload.
    #[instrument(skip(self))]
    pub async fn run(&self, id: Uuid) -> Result<(), ClientError> {
        self.session.transition(id, UploadState::Optimizing)?;
        let entry = self
            .session
            .entry(id)
            .ok_or(ClientError::UnknownEntry(id))?;

        let optimized = match optimize_in_background(entry.file, self.max_width).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Error optimizing image: {}", e);
                self.session
                    .notify_error(format!("Failed to optimize {}", entry.original_name));
                self.session.transition(id, UploadState::Error)?;
                return Err(e);
            }
        };
        let file = optimized.clone();
        self.session.update(id, |entry| {
            entry.file = optimized;
            Ok(())
        })?;

        self.session
            .transition(id, UploadState::Uploading { progress: 0 })?;

        let request = UploadRequest {
            filename: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.size(),
            title: Some(file.name.clone()),
            category_ids: entry.category_ids,
        };
        let grant = match self.backend.request_upload(&request).await {
            Ok(grant) => grant,
            Err(e) => {
                self.session.notify_error("Failed to get presigned URL");
                self.session.transition(id, UploadState::Error)?;
                return Err(e);
            }
        };
        self.session.update(id, |entry| {
            entry.key = Some(grant.key.clone());
            entry.image_id = Some(grant.image_id);
            Ok(())
        })?;

        let session = self.session.clone();
        let on_progress = move |progress: u8| {
            // Late or duplicate reports are dropped by the transition check.
            let _ = session.transition(id, UploadState::Uploading { progress });
        };

        let put = self
            .backend
            .put_object(
                &grant.presigned_url,
                &file.content_type,
                file.data.clone(),
                &on_progress,
            )
            .await;

        match put {
            Ok(()) => {
                self.session
                    .transition(id, UploadState::Uploading { progress: 100 })?;
                self.session.transition(id, UploadState::Uploaded)?;
                self.session.update(id, |entry| {
                    entry.image_url = Some(grant.image_url.clone());
                    Ok(())
                })?;
                self.session.notify_success("File uploaded successfully");
                Ok(())
            }
            Err(e) => {
                warn!("Error during upload process: {}", e);
                self.session
                    .notify_error("Something went wrong during upload.");
                self.session.transition(id, UploadState::Error)?;
                Err(e)
            }
        }
    }

    /// Delete an uploaded file's record and object.
    ///
    /// On success the entry leaves the session; on failure it returns to
    /// `uploaded` with its error flag set.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ClientError> {
        self.session.transition(id, UploadState::Deleting)?;
        let key = self
            .session
            .entry(id)
            .and_then(|entry| entry.key)
            .ok_or(ClientError::UnknownEntry(id))?;

        match self.backend.delete_image(&key).await {
            Ok(_) => {
                self.session.remove(id);
                self.session.notify_success("File removed successfully");
                Ok(())
            }
            Err(e) => {
                self.session
                    .notify_error("Failed to remove file from storage.");
                self.session.transition(id, UploadState::Uploaded)?;
                self.session.update(id, |entry| {
                    entry.error = true;
                    Ok(())
                })?;
                Err(e)
            }
        }
    }
}
