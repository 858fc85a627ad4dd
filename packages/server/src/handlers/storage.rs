use std::time::Duration;

use axum::Json;
use axum::extract::State;
use common::storage::{ObjectKey, issue_upload_url};
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::MessageResponse;
use crate::models::storage::*;
use crate::state::AppState;
use crate::store::image::{ImageStore, NewImage};

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Storage",
    operation_id = "createUpload",
    summary = "Issue a presigned upload URL",
    description = "Generates a unique object key, creates the image record, and returns a URL authorizing a single PUT of exactly `size` bytes of `contentType`. The image joins `categoryIds`, or `Uncategorized` when none are given.",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Upload authorized", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(filename = %payload.filename, size = payload.size))]
pub async fn create_upload(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    validate_upload_request(&payload, state.config.upload.max_file_size)?;

    let ticket = issue_upload_url(
        state.object_store.as_ref(),
        &payload.filename,
        &payload.content_type,
        payload.size,
        Duration::from_secs(state.config.storage.presign_expiry_secs),
    )
    .await?;

    let category_ids = match payload.category_ids.as_deref() {
        Some(ids) if !ids.is_empty() => ids.to_vec(),
        _ => vec![state.default_category_id],
    };

    let image = ImageStore::new(&state.db)
        .create(NewImage {
            title: payload.effective_title(),
            storage_key: ticket.key.to_string(),
            url: ticket.public_url.clone(),
            category_ids,
        })
        .await?;

    info!(image_id = image.id, key = %ticket.key, "Issued upload URL");

    Ok(Json(UploadResponse {
        presigned_url: ticket.presigned_url,
        key: ticket.key.into(),
        image_url: ticket.public_url,
        image_id: image.id,
    }))
}

#[utoipa::path(
    delete,
    path = "/delete",
    tag = "Storage",
    operation_id = "deleteUpload",
    summary = "Delete an image and its stored object",
    description = "Removes the image record, then the object. If the object removal fails after the record is gone, the object is left orphaned and 500 is returned.",
    request_body = DeleteObjectRequest,
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No image with this key (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(key = %payload.key))]
pub async fn delete_upload(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeleteObjectRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_delete_request(&payload)?;
    let key = ObjectKey::parse(payload.key.trim())?;

    let removed = ImageStore::new(&state.db).delete_by_key(key.as_str()).await?;

    if let Err(e) = state.object_store.delete(&key).await {
        warn!(
            image_id = removed.id,
            key = %key,
            error = %e,
            "Image row deleted but object remains orphaned"
        );
        return Err(AppError::from(e));
    }

    Ok(Json(MessageResponse::new("Image deleted successfully.")))
}
