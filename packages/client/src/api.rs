use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::models::*;

/// Size of each body chunk handed to the transport during a direct upload.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Receives integer upload progress in percent (0-100).
pub type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Operations the upload pipeline and library browser need from the server
/// and the object store.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError>;

    async fn create_category(&self, name: &str) -> Result<Category, ClientError>;

    async fn delete_category(&self, id: i32) -> Result<String, ClientError>;

    async fn list_images(&self, query: ImageQuery) -> Result<Vec<Image>, ClientError>;

    async fn update_image(&self, id: i32, update: &ImageUpdate) -> Result<Image, ClientError>;

    async fn request_upload(&self, request: &UploadRequest) -> Result<UploadGrant, ClientError>;

    /// PUT `data` to a presigned URL, reporting progress as bytes go out.
    async fn put_object(
        &self,
        presigned_url: &str,
        content_type: &str,
        data: Bytes,
        progress: &ProgressFn,
    ) -> Result<(), ClientError>;

    async fn delete_image(&self, key: &str) -> Result<String, ClientError>;
}

/// HTTP implementation of [`MediaBackend`].
#[derive(Clone)]
pub struct MediaApi {
    http: Client,
    base_url: String,
}

impl MediaApi {
    /// `base_url` is the server origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/media{}", self.base_url, path)
    }
}

/// Decode a JSON success body, or turn the server's error body into
/// [`ClientError::Api`].
async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let text = res.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => {
            let message = match body.details.first() {
                Some(detail) if !detail.path.is_empty() => {
                    format!("{} ({}: {})", body.message, detail.path, detail.message)
                }
                Some(detail) => format!("{}: {}", body.message, detail.message),
                None => body.message,
            };
            (body.code, message)
        }
        Err(_) => ("UNKNOWN".to_string(), text),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

/// Integer percentage of `sent` over `total`. An empty body counts as done.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) * 100) / total) as u8
}

#[async_trait]
impl MediaBackend for MediaApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let res = self.http.get(self.url("/categories")).send().await?;
        decode(res).await
    }

    async fn create_category(&self, name: &str) -> Result<Category, ClientError> {
        let res = self
            .http
            .post(self.url("/categories"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        decode(res).await
    }

    async fn delete_category(&self, id: i32) -> Result<String, ClientError> {
        let res = self
            .http
            .delete(self.url(&format!("/categories/{id}")))
            .send()
            .await?;
        let body: MessageResponse = decode(res).await?;
        Ok(body.message)
    }

    async fn list_images(&self, query: ImageQuery) -> Result<Vec<Image>, ClientError> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(category_id) = query.category_id {
            params.push(("categoryId", category_id.to_string()));
        }

        let res = self
            .http
            .get(self.url("/images"))
            .query(&params)
            .send()
            .await?;
        decode(res).await
    }

    async fn update_image(&self, id: i32, update: &ImageUpdate) -> Result<Image, ClientError> {
        let res = self
            .http
            .patch(self.url(&format!("/images/{id}")))
            .json(update)
            .send()
            .await?;
        decode(res).await
    }

    async fn request_upload(&self, request: &UploadRequest) -> Result<UploadGrant, ClientError> {
        let res = self
            .http
            .post(self.url("/s3/upload"))
            .json(request)
            .send()
            .await?;
        decode(res).await
    }

    async fn put_object(
        &self,
        presigned_url: &str,
        content_type: &str,
        data: Bytes,
        progress: &ProgressFn,
    ) -> Result<(), ClientError> {
        let total = data.len() as u64;

        // Chunks are cheap slices of the same buffer. Progress is reported
        // as each one is handed to the transport.
        let chunks: Vec<Bytes> = (0..data.len())
            .step_by(UPLOAD_CHUNK_SIZE)
            .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(data.len())))
            .collect();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        let mut sent = 0u64;
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = tx.send(percent(sent, total));
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let request = self
            .http
            .put(presigned_url)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(body))
            .send();
        tokio::pin!(request);

        let res = loop {
            tokio::select! {
                Some(pct) = rx.recv() => progress(pct),
                res = &mut request => break res?,
            }
        };
        while let Ok(pct) = rx.try_recv() {
            progress(pct);
        }

        match res.status().as_u16() {
            200 | 204 => {
                debug!(total, "Direct upload complete");
                progress(100);
                Ok(())
            }
            status => Err(ClientError::UploadStatus(status)),
        }
    }

    async fn delete_image(&self, key: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .delete(self.url("/s3/delete"))
            .json(&serde_json::json!({ "key": key }))
            .send()
            .await?;
        let body: MessageResponse = decode(res).await?;
        Ok(body.message)
    }
}
