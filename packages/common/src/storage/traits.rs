use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;
use super::key::ObjectKey;

/// Gateway to an S3-compatible object store.
///
/// Payload bytes never pass through the application: clients receive a
/// presigned URL and upload directly to the store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Issue a time-limited URL authorizing a single PUT of `size` bytes of
    /// `content_type` to `key`.
    async fn presign_put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        size: u64,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    /// Delete an object.
    ///
    /// Deleting a missing object succeeds; callers own existence semantics.
    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError>;

    /// Deterministic public retrieval URL for `key`.
    fn public_url(&self, key: &ObjectKey) -> String;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Join a base URL and an object key with exactly one slash between them.
pub(crate) fn join_url(base: &str, key: &ObjectKey) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.as_str())
}
