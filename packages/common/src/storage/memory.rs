use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::key::ObjectKey;
use super::traits::{ObjectStore, join_url};

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// An outstanding upload authorization.
#[derive(Debug, Clone)]
struct PutGrant {
    content_type: String,
    size: u64,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<ObjectKey, StoredObject>,
    grants: HashMap<ObjectKey, PutGrant>,
}

/// Process-local object store.
///
/// Mirrors the presigned-PUT contract of a real bucket: a grant issued by
/// [`ObjectStore::presign_put`] admits exactly one matching
/// [`MemoryObjectStore::put_presigned`] before it expires.
pub struct MemoryObjectStore {
    bucket: String,
    inner: RwLock<Inner>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Store an object directly, bypassing presigning.
    pub async fn put(&self, key: &ObjectKey, content_type: &str, data: Vec<u8>) {
        self.inner.write().await.objects.insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
    }

    /// Complete an upload previously authorized by `presign_put`.
    pub async fn put_presigned(
        &self,
        key: &ObjectKey,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        let grant = inner
            .grants
            .remove(key)
            .ok_or_else(|| StorageError::Backend(format!("no upload grant for {key}")))?;

        if Instant::now() > grant.expires_at {
            return Err(StorageError::Backend(format!("upload grant for {key} expired")));
        }
        if grant.content_type != content_type {
            return Err(StorageError::Backend(format!(
                "content type mismatch: signed {}, got {content_type}",
                grant.content_type
            )));
        }
        if grant.size != data.len() as u64 {
            return Err(StorageError::Backend(format!(
                "content length mismatch: signed {}, got {}",
                grant.size,
                data.len()
            )));
        }

        inner.objects.insert(
            key.clone(),
            StoredObject {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    pub async fn get(&self, key: &ObjectKey) -> Result<StoredObject, StorageError> {
        self.inner
            .read()
            .await
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn presign_put(
        &self,
        key: &ObjectKey,
        content_type: &str,
        size: u64,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.grants.retain(|_, grant| grant.expires_at >= now);
        inner.grants.insert(
            key.clone(),
            PutGrant {
                content_type: content_type.to_string(),
                size,
                expires_at: now + expires_in,
            },
        );
        Ok(format!(
            "memory://{}/{}?expires={}",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner.objects.remove(key);
        inner.grants.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        Ok(self.inner.read().await.objects.contains_key(key))
    }

    fn public_url(&self, key: &ObjectKey) -> String {
        join_url(&format!("memory://{}", self.bucket), key)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
