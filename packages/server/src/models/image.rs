use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::image;
use crate::error::ValidationIssue;

use super::category::CategoryResponse;
use super::shared::{finish, validate_id_list, validate_title};

/// Query parameters for listing images.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ImageListQuery {
    /// Page size (default 15, capped at the configured maximum). Zero yields an empty page.
    pub limit: Option<u64>,
    /// Number of images to skip (default 0).
    pub offset: Option<u64>,
    /// Restrict to images in this category. Non-numeric values are ignored.
    pub category_id: Option<String>,
}

impl ImageListQuery {
    /// The category filter, if the parameter parses as an ID.
    pub fn category_filter(&self) -> Option<i32> {
        self.category_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
    }
}

/// Resolved paging window for an image listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePage {
    pub limit: u64,
    pub offset: u64,
    pub category_id: Option<i32>,
}

impl ImagePage {
    pub fn from_query(query: &ImageListQuery, default_limit: u64, max_limit: u64) -> Self {
        Self {
            limit: query.limit.unwrap_or(default_limit).min(max_limit),
            offset: query.offset.unwrap_or(0),
            category_id: query.category_filter(),
        }
    }
}

/// An image with its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    #[schema(example = 17)]
    pub id: i32,
    #[schema(example = "Harbour at dusk")]
    pub title: String,
    #[schema(example = "2b1f8c2e-6d4b-4f5e-9f51-0a3c1e7d9b42-harbour.webp")]
    pub storage_key: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<CategoryResponse>,
}

impl ImageResponse {
    pub fn from_model(m: image::Model, categories: Vec<CategoryResponse>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            storage_key: m.storage_key,
            url: m.url,
            created_at: m.created_at,
            categories,
        }
    }
}

/// Partial update of an image. Absent fields are left untouched.
#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageRequest {
    /// New title (1-256 characters, trimmed).
    pub title: Option<String>,
    /// Full desired category set; replaces the current one.
    pub category_ids: Option<Vec<i32>>,
}

pub fn validate_update_image(req: &UpdateImageRequest) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    if let Some(ref title) = req.title {
        validate_title(title, "title", &mut issues);
    }
    if let Some(ref ids) = req.category_ids {
        validate_id_list(ids, "categoryIds", &mut issues);
    }
    finish(issues)
}
