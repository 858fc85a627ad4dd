use std::time::Duration;

use super::error::StorageError;
use super::key::ObjectKey;
use super::traits::ObjectStore;

/// Default lifetime of a presigned upload URL.
pub const DEFAULT_UPLOAD_EXPIRY: Duration = Duration::from_secs(6 * 60);

/// Everything a client needs to push one object straight to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub key: ObjectKey,
    pub presigned_url: String,
    pub public_url: String,
}

/// Allocate a fresh key for `filename` and presign a PUT for it.
pub async fn issue_upload_url(
    store: &dyn ObjectStore,
    filename: &str,
    content_type: &str,
    size: u64,
    expires_in: Duration,
) -> Result<UploadTicket, StorageError> {
    let key = ObjectKey::generate(filename)?;
    let presigned_url = store
        .presign_put(&key, content_type, size, expires_in)
        .await?;
    let public_url = store.public_url(&key);

    Ok(UploadTicket {
        key,
        presigned_url,
        public_url,
    })
}
