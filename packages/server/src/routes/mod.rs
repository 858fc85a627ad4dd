use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

/// Routes mounted under `/api/media`.
pub fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/categories", category_routes())
        .nest("/images", image_routes())
        .nest("/s3", storage_routes())
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::list_categories,
            handlers::category::create_category
        ))
        .routes(routes!(handlers::category::delete_category))
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::image::list_images))
        .routes(routes!(handlers::image::update_image))
}

fn storage_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::storage::create_upload))
        .routes(routes!(handlers::storage::delete_upload))
}
