use sea_orm::*;
use tracing::debug;

use crate::entity::category::{self, DEFAULT_CATEGORY};
use crate::entity::image_category;
use crate::error::AppError;

pub struct CategoryStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C> CategoryStore<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All categories, ordered by name.
    pub async fn list(&self) -> Result<Vec<category::Model>, AppError> {
        Ok(category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(self.conn)
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<category::Model>, AppError> {
        Ok(category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(self.conn)
            .await?)
    }

    /// Create a category. The name is trimmed; callers validate it first.
    pub async fn create(&self, name: &str) -> Result<category::Model, AppError> {
        let name = name.trim();

        if self.find_by_name(name).await?.is_some() {
            return Err(duplicate_name());
        }

        let model = category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        model.insert(self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                debug!("Category create race: unique constraint caught on insert");
                duplicate_name()
            }
            _ => AppError::from(e),
        })
    }

    /// Delete a category and its image associations. Images themselves are kept.
    ///
    /// The default category is protected regardless of how many images use it.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if let Some(default) = self.find_by_name(DEFAULT_CATEGORY).await?
            && default.id == id
        {
            return Err(AppError::Forbidden(format!(
                "The '{DEFAULT_CATEGORY}' category cannot be deleted."
            )));
        }

        let txn = self.conn.begin().await?;

        let unlinked = image_category::Entity::delete_many()
            .filter(image_category::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        let deleted = category::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound(
                "Category not found or already deleted.".into(),
            ));
        }

        txn.commit().await?;
        debug!(id, unlinked = unlinked.rows_affected, "Deleted category");
        Ok(())
    }
}

fn duplicate_name() -> AppError {
    AppError::Conflict("Category with this name already exists.".into())
}
