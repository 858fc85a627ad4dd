use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::debug;

use crate::entity::{category, image, image_category};
use crate::error::{AppError, ValidationIssue};
use crate::models::category::CategoryResponse;
use crate::models::image::{ImagePage, ImageResponse};

use super::missing_category_ids;

/// Association changes needed to move an image from one category set to another.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryDiff {
    pub connect: Vec<i32>,
    pub disconnect: Vec<i32>,
}

impl CategoryDiff {
    pub fn between(current: &[i32], desired: &[i32]) -> Self {
        let current: BTreeSet<i32> = current.iter().copied().collect();
        let desired: BTreeSet<i32> = desired.iter().copied().collect();
        Self {
            connect: desired.difference(&current).copied().collect(),
            disconnect: current.difference(&desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.connect.is_empty() && self.disconnect.is_empty()
    }
}

/// Fields of an image record created at upload time.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub title: String,
    pub storage_key: String,
    pub url: String,
    pub category_ids: Vec<i32>,
}

/// Requested edits to an existing image.
#[derive(Debug, Default, Clone)]
pub struct ImageEdit {
    pub title: Option<String>,
    pub category_ids: Option<Vec<i32>>,
}

pub struct ImageStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C> ImageStore<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Newest-first page of images, optionally restricted to one category.
    pub async fn list(&self, page: ImagePage) -> Result<Vec<ImageResponse>, AppError> {
        if page.limit == 0 {
            return Ok(Vec::new());
        }

        let mut select = image::Entity::find();

        if let Some(category_id) = page.category_id {
            select = select.filter(
                image::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(image_category::Column::ImageId)
                        .from(image_category::Entity)
                        .and_where(image_category::Column::CategoryId.eq(category_id))
                        .to_owned(),
                ),
            );
        }

        let images = select
            .order_by_desc(image::Column::CreatedAt)
            .order_by_desc(image::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(self.conn)
            .await?;

        self.attach_categories(images).await
    }

    pub async fn get(&self, id: i32) -> Result<ImageResponse, AppError> {
        let model = find_image(self.conn, id).await?;
        let mut with_categories = self.attach_categories(vec![model]).await?;
        with_categories
            .pop()
            .ok_or_else(|| AppError::NotFound("Image not found".into()))
    }

    /// Insert an image and its category links in one transaction.
    ///
    /// Every ID in `category_ids` must exist.
    pub async fn create(&self, new: NewImage) -> Result<image::Model, AppError> {
        ensure_categories_exist(self.conn, &new.category_ids).await?;

        let txn = self.conn.begin().await?;

        let model = image::ActiveModel {
            title: Set(new.title),
            storage_key: Set(new.storage_key),
            url: Set(new.url),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("An image with this key already exists.".into())
            }
            _ => AppError::from(e),
        })?;

        link_categories(&txn, model.id, &new.category_ids).await?;

        txn.commit().await?;
        debug!(image_id = model.id, key = %model.storage_key, "Created image record");
        Ok(model)
    }

    /// Apply a title change and/or replace the category set.
    pub async fn update(&self, id: i32, edit: ImageEdit) -> Result<ImageResponse, AppError> {
        if let Some(ref ids) = edit.category_ids {
            ensure_categories_exist(self.conn, ids).await?;
        }

        let txn = self.conn.begin().await?;
        let existing = find_image(&txn, id).await?;

        if let Some(title) = edit.title {
            let mut active: image::ActiveModel = existing.into();
            active.title = Set(title.trim().to_string());
            active.update(&txn).await?;
        }

        if let Some(desired) = edit.category_ids {
            let current: Vec<i32> = image_category::Entity::find()
                .select_only()
                .column(image_category::Column::CategoryId)
                .filter(image_category::Column::ImageId.eq(id))
                .into_tuple()
                .all(&txn)
                .await?;

            let diff = CategoryDiff::between(&current, &desired);
            if !diff.disconnect.is_empty() {
                image_category::Entity::delete_many()
                    .filter(image_category::Column::ImageId.eq(id))
                    .filter(image_category::Column::CategoryId.is_in(diff.disconnect.clone()))
                    .exec(&txn)
                    .await?;
            }
            link_categories(&txn, id, &diff.connect).await?;
            debug!(
                image_id = id,
                connected = diff.connect.len(),
                disconnected = diff.disconnect.len(),
                "Updated image categories"
            );
        }

        txn.commit().await?;
        self.get(id).await
    }

    /// Remove the image row and its links. Returns the removed record.
    pub async fn delete_by_key(&self, storage_key: &str) -> Result<image::Model, AppError> {
        let txn = self.conn.begin().await?;

        let existing = image::Entity::find()
            .filter(image::Column::StorageKey.eq(storage_key))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

        image_category::Entity::delete_many()
            .filter(image_category::Column::ImageId.eq(existing.id))
            .exec(&txn)
            .await?;
        image::Entity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(existing)
    }

    async fn attach_categories(
        &self,
        images: Vec<image::Model>,
    ) -> Result<Vec<ImageResponse>, AppError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = images.iter().map(|m| m.id).collect();
        let rows = image_category::Entity::find()
            .filter(image_category::Column::ImageId.is_in(ids))
            .find_also_related(category::Entity)
            .order_by_asc(category::Column::Name)
            .all(self.conn)
            .await?;

        let mut by_image: HashMap<i32, Vec<CategoryResponse>> = HashMap::new();
        for (link, cat) in rows {
            if let Some(cat) = cat {
                by_image
                    .entry(link.image_id)
                    .or_default()
                    .push(CategoryResponse::from(cat));
            }
        }

        Ok(images
            .into_iter()
            .map(|m| {
                let cats = by_image.remove(&m.id).unwrap_or_default();
                ImageResponse::from_model(m, cats)
            })
            .collect())
    }
}

async fn find_image<C: ConnectionTrait>(conn: &C, id: i32) -> Result<image::Model, AppError> {
    image::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
}

async fn ensure_categories_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<(), AppError> {
    let missing = missing_category_ids(conn, ids).await?;
    if missing.is_empty() {
        return Ok(());
    }

    let issues = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| missing.contains(id))
        .map(|(i, id)| {
            ValidationIssue::new(
                format!("categoryIds.{i}"),
                format!("Category {id} does not exist"),
            )
        })
        .collect::<Vec<_>>();
    Err(AppError::InvalidBody(issues))
}

async fn link_categories<C: ConnectionTrait>(
    conn: &C,
    image_id: i32,
    category_ids: &[i32],
) -> Result<(), DbErr> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids.iter().map(|&category_id| image_category::ActiveModel {
        image_id: Set(image_id),
        category_id: Set(category_id),
    });
    image_category::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
