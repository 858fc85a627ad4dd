use std::time::Duration;

use async_trait::async_trait;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use serde::Deserialize;
use tracing::debug;

use super::error::StorageError;
use super::key::ObjectKey;
use super::traits::{ObjectStore, join_url};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Options {
    /// Endpoint URL, e.g. `https://minio.example.com`.
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base for public retrieval URLs. Defaults to `{endpoint}/{bucket}`.
    #[serde(default)]
    pub public_url: Option<String>,
}

/// Object store backed by an S3-compatible service (AWS, MinIO, R2, ...).
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base: String,
}

impl S3ObjectStore {
    pub fn new(bucket: &str, opts: &S3Options) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: opts.region.clone(),
            endpoint: opts.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&opts.access_key),
            Some(&opts.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        // Path-style addressing keeps MinIO and other self-hosted stores working.
        let public_base = opts
            .public_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", opts.endpoint.trim_end_matches('/'), bucket));

        let bucket = Bucket::new(bucket, region, credentials)?.with_path_style();

        Ok(Self {
            bucket,
            public_base,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        size: u64,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|e| StorageError::Backend(format!("invalid content type: {e}")))?,
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(size));

        let expiry_secs = u32::try_from(expires_in.as_secs())
            .map_err(|_| StorageError::Backend("presign expiry too long".into()))?;

        let url = self
            .bucket
            .presign_put(key.as_str(), expiry_secs, Some(headers), None)
            .await?;
        debug!(key = %key, expiry_secs, "Issued presigned PUT");
        Ok(url)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError> {
        let response = self.bucket.delete_object(key.as_str()).await?;
        match response.status_code() {
            200..=299 | 404 => Ok(()),
            status => Err(StorageError::Backend(format!(
                "delete of {key} failed with status {status}"
            ))),
        }
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        let (_, status) = self.bucket.head_object(key.as_str()).await?;
        match status {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::Backend(format!(
                "head of {key} failed with status {status}"
            ))),
        }
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        join_url(&self.public_base, key)
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
