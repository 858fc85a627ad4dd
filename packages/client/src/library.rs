//! Paged browsing of uploaded images with an optional category filter.

use std::sync::Arc;

use crate::api::MediaBackend;
use crate::error::ClientError;
use crate::models::{Image, ImageQuery, ImageUpdate};

/// Images fetched per page.
pub const PAGE_SIZE: u64 = 15;

pub struct Library<B> {
    backend: Arc<B>,
    page_size: u64,
    category_id: Option<i32>,
    images: Vec<Image>,
    has_more: bool,
}

impl<B: MediaBackend> Library<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            page_size: PAGE_SIZE,
            category_id: None,
            images: Vec::new(),
            has_more: true,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Whether another page may exist. A short page means the end was reached.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn category_filter(&self) -> Option<i32> {
        self.category_id
    }

    /// Change the filter and reload from the first page.
    pub async fn set_category_filter(&mut self, category_id: Option<i32>) -> Result<(), ClientError> {
        self.category_id = category_id;
        self.refresh().await
    }

    /// Discard loaded images and fetch the first page.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.images.clear();
        self.has_more = true;
        self.load_more().await?;
        Ok(())
    }

    /// Append the next page. Returns how many images were added.
    pub async fn load_more(&mut self) -> Result<usize, ClientError> {
        let query = ImageQuery {
            limit: self.page_size,
            offset: self.images.len() as u64,
            category_id: self.category_id,
        };
        let page = self.backend.list_images(query).await?;
        let added = page.len();
        self.has_more = added as u64 == self.page_size;
        self.images.extend(page);
        Ok(added)
    }

    /// Edit an image, then reload what was already shown.
    pub async fn update(&mut self, id: i32, update: &ImageUpdate) -> Result<Image, ClientError> {
        let updated = self.backend.update_image(id, update).await?;
        self.reload_loaded().await?;
        Ok(updated)
    }

    /// Delete an image by storage key, then reload.
    pub async fn delete(&mut self, key: &str) -> Result<String, ClientError> {
        let message = self.backend.delete_image(key).await?;
        self.reload_loaded().await?;
        Ok(message)
    }

    /// Refetch as many pages as were loaded before a mutation.
    async fn reload_loaded(&mut self) -> Result<(), ClientError> {
        let pages = self.images.len().max(1).div_ceil(self.page_size as usize);
        self.refresh().await?;
        for _ in 1..pages {
            if !self.has_more || self.load_more().await? == 0 {
                break;
            }
        }
        Ok(())
    }
}
