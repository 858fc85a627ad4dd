use common::storage::s3_store::S3Options;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Which object store implementation backs the gateway.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    /// Process-local store for development; objects vanish on restart.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Lifetime of presigned upload URLs.
    pub presign_expiry_secs: u64,
    /// Bucket name. The memory backend uses it only for URL construction.
    pub bucket: String,
    /// Required when `backend = "s3"`.
    pub s3: Option<S3Options>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted upload in bytes.
    pub max_file_size: u64,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            default_page_size: 15,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.backend", "s3")?
            .set_default("storage.presign_expiry_secs", 360)?
            .set_default("upload.max_file_size", 10 * 1024 * 1024)?
            .set_default("upload.default_page_size", 15)?
            .set_default("upload.max_page_size", 100)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MEDIASHELF__STORAGE__BUCKET)
            .add_source(Environment::with_prefix("MEDIASHELF").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::S3 && self.storage.s3.is_none() {
            return Err(ConfigError::Message(
                "storage.s3 must be configured when storage.backend = \"s3\"".into(),
            ));
        }
        if self.upload.default_page_size == 0
            || self.upload.default_page_size > self.upload.max_page_size
        {
            return Err(ConfigError::Message(
                "upload.default_page_size must be between 1 and upload.max_page_size".into(),
            ));
        }
        Ok(())
    }
}
