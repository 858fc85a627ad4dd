use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::ObjectStore;
use common::storage::memory::MemoryObjectStore;
use common::storage::s3_store::S3ObjectStore;
use tracing::{Level, info, warn};

use server::config::{AppConfig, StorageBackend, StorageConfig};
use server::state::AppState;
use server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed::ensure_indexes(&db).await?;
    let default_category = seed::ensure_default_category(&db)
        .await
        .context("Failed to ensure default category")?;
    info!(
        "Default category '{}' has id {}",
        default_category.name, default_category.id
    );

    let object_store = build_object_store(&config.storage)?;
    info!("Storage backend: {}", object_store.backend_name());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        object_store,
        default_category_id: default_category.id,
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_object_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::S3 => {
            let opts = config
                .s3
                .as_ref()
                .context("storage.s3 is required for the s3 backend")?;
            Ok(Arc::new(S3ObjectStore::new(&config.bucket, opts)?))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory object store; uploaded objects are lost on restart");
            Ok(Arc::new(MemoryObjectStore::new(config.bucket.clone())))
        }
    }
}
