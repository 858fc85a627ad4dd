//! Batch acceptance rules applied before files enter the upload pipeline.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use mime_guess::mime;

use crate::error::ClientError;

/// Most files accepted from a single selection.
pub const MAX_FILES: usize = 5;

/// Largest accepted original file, in bytes.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const TOO_MANY_FILES_MESSAGE: &str = "Too many files selected, max is 5";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size exceeds 10mb limit";
pub const INVALID_TYPE_MESSAGE: &str = "Only image files are accepted";

/// A file picked by the user, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

fn guess_content_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn is_image_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::IMAGE)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl SelectedFile {
    /// Build a file, guessing its MIME type from the name's extension.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name);
        Self {
            name,
            content_type,
            data: data.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(display_name(path), data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_image(&self) -> bool {
        is_image_type(&self.content_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    TooManyFiles,
    FileTooLarge,
    InvalidType,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TooManyFiles => TOO_MANY_FILES_MESSAGE,
            Self::FileTooLarge => FILE_TOO_LARGE_MESSAGE,
            Self::InvalidType => INVALID_TYPE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectionReason,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<SelectedFile>,
    pub rejected: Vec<Rejection>,
}

impl BatchOutcome {
    /// One user-facing message per distinct rejection reason, in first-seen order.
    pub fn notices(&self) -> Vec<&'static str> {
        let mut notices = Vec::new();
        for rejection in &self.rejected {
            let message = rejection.reason.message();
            if !notices.contains(&message) {
                notices.push(message);
            }
        }
        notices
    }
}

fn check(content_type: &str, size: u64, accepted: usize) -> Option<RejectionReason> {
    if !is_image_type(content_type) {
        Some(RejectionReason::InvalidType)
    } else if size > MAX_FILE_SIZE {
        Some(RejectionReason::FileTooLarge)
    } else if accepted >= MAX_FILES {
        Some(RejectionReason::TooManyFiles)
    } else {
        None
    }
}

/// Split a selection into files that may enter the pipeline and rejections.
///
/// Type and size are checked per file. Of the files that pass, the first
/// [`MAX_FILES`] are accepted and the rest are rejected as too many.
pub fn accept_batch(files: Vec<SelectedFile>) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for file in files {
        match check(&file.content_type, file.size(), outcome.accepted.len()) {
            Some(reason) => outcome.rejected.push(Rejection {
                name: file.name,
                reason,
            }),
            None => outcome.accepted.push(file),
        }
    }

    outcome
}

/// [`accept_batch`] for files on disk.
///
/// Rules are applied to file metadata, so rejected files are never read.
pub async fn accept_paths(paths: &[PathBuf]) -> Result<BatchOutcome, ClientError> {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        let name = display_name(path);
        let size = tokio::fs::metadata(path).await?.len();
        match check(&guess_content_type(&name), size, outcome.accepted.len()) {
            Some(reason) => outcome.rejected.push(Rejection { name, reason }),
            None => outcome.accepted.push(SelectedFile::from_path(path).await?),
        }
    }

    Ok(outcome)
}
