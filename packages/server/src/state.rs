use std::sync::Arc;

use common::ObjectStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub object_store: Arc<dyn ObjectStore>,
    /// ID of the "Uncategorized" row, resolved once at startup.
    pub default_category_id: i32,
}
