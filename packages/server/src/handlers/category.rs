use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::category::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::store::category::CategoryStore;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List all categories",
    description = "Returns every category ordered by name, including the protected `Uncategorized` category.",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
        (status = 500, description = "Database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = CategoryStore::new(&state.db).list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Creates a category with a unique, trimmed name of 1-128 characters. Returns 409 CONFLICT if the name is taken.",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_category(&payload)?;

    let model = CategoryStore::new(&state.db).create(&payload.name).await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Deletes a category and its image associations. Images are kept, even if this leaves them with no category. The `Uncategorized` category cannot be deleted.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Protected category (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    CategoryStore::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully.")))
}
