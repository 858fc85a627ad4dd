use mime_guess::mime::{self, Mime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationIssue;
use crate::utils::filename::validate_flat_filename;

use super::shared::{finish, validate_id_list, MAX_TITLE_CHARS};

/// Request body for issuing a presigned upload URL.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Name of the file being uploaded; becomes the key suffix.
    #[schema(example = "harbour.webp")]
    pub filename: String,
    /// MIME type the client will PUT. Must be `image/*`.
    #[schema(example = "image/webp")]
    pub content_type: String,
    /// Exact byte length the client will PUT.
    #[schema(example = 482113)]
    pub size: u64,
    /// Display title. Defaults to the filename.
    pub title: Option<String>,
    /// Categories for the new image. Empty or absent means the default category.
    pub category_ids: Option<Vec<i32>>,
}

impl UploadRequest {
    /// The effective title: the trimmed title if non-blank, else the filename.
    pub fn effective_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self.filename.trim().to_string(),
        }
    }
}

/// Presigned upload grant.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// URL authorizing a single PUT; valid for six minutes by default.
    pub presigned_url: String,
    /// Object key the upload will land at.
    pub key: String,
    /// Public retrieval URL of the object.
    pub image_url: String,
    /// ID of the image record created for this upload.
    pub image_id: i32,
}

/// Request body for deleting an uploaded image.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DeleteObjectRequest {
    /// Object key of the image to delete.
    pub key: String,
}

pub fn validate_upload_request(
    req: &UploadRequest,
    max_file_size: u64,
) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if let Err(e) = validate_flat_filename(&req.filename) {
        issues.push(ValidationIssue::new("filename", e.message()));
    }

    match req.content_type.parse::<Mime>() {
        Ok(m) if m.type_() == mime::IMAGE => {}
        Ok(_) => issues.push(ValidationIssue::new(
            "contentType",
            "Only image uploads are accepted",
        )),
        Err(_) => issues.push(ValidationIssue::new(
            "contentType",
            "Content type is not a valid MIME type",
        )),
    }

    if req.size == 0 || req.size > max_file_size {
        issues.push(ValidationIssue::new(
            "size",
            format!("Size must be 1-{max_file_size} bytes"),
        ));
    }

    if let Some(ref title) = req.title
        && title.trim().chars().count() > MAX_TITLE_CHARS
    {
        issues.push(ValidationIssue::new(
            "title",
            format!("Title must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }

    if let Some(ref ids) = req.category_ids {
        validate_id_list(ids, "categoryIds", &mut issues);
    }

    finish(issues)
}

pub fn validate_delete_request(req: &DeleteObjectRequest) -> Result<(), Vec<ValidationIssue>> {
    if req.key.trim().is_empty() {
        return Err(vec![ValidationIssue::new("key", "Key must not be empty")]);
    }
    Ok(())
}
