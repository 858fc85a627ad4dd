use thiserror::Error;

use crate::session::UploadState;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Upload failed with status: {0}")]
    UploadStatus(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("WebP encoding failed: {0}")]
    Encode(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: UploadState, to: UploadState },

    #[error("Unknown upload entry: {0}")]
    UnknownEntry(uuid::Uuid),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl ClientError {
    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::UploadStatus(status) => Some(*status),
            _ => None,
        }
    }
}
