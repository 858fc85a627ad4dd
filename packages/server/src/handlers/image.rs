use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::image::*;
use crate::state::AppState;
use crate::store::image::{ImageEdit, ImageStore};

#[utoipa::path(
    get,
    path = "/",
    tag = "Images",
    operation_id = "listImages",
    summary = "List images, newest first",
    description = "Returns one page of images with their categories, ordered by creation time descending. `limit` defaults to 15 and is clamped to the configured maximum. A non-numeric `categoryId` is ignored.",
    params(ImageListQuery),
    responses(
        (status = 200, description = "Page of images", body = Vec<ImageResponse>),
        (status = 500, description = "Database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_images(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ImageListQuery>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let page = ImagePage::from_query(
        &query,
        state.config.upload.default_page_size,
        state.config.upload.max_page_size,
    );
    let images = ImageStore::new(&state.db).list(page).await?;
    Ok(Json(images))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Images",
    operation_id = "updateImage",
    summary = "Update an image's title and/or categories",
    description = "Absent fields are left untouched. `categoryIds` replaces the full category set; an empty list removes every category.",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Updated image", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_image(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    validate_update_image(&payload)?;

    let edit = ImageEdit {
        title: payload.title,
        category_ids: payload.category_ids,
    };
    let updated = ImageStore::new(&state.db).update(id, edit).await?;
    Ok(Json(updated))
}
