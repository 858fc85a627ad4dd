use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::category::{self, DEFAULT_CATEGORY};
use crate::entity::image_category;

/// Make sure the default category exists and return it.
///
/// Idempotent: concurrent or repeated calls all resolve to the same row.
pub async fn ensure_default_category<C: ConnectionTrait>(
    db: &C,
) -> Result<category::Model, DbErr> {
    let model = category::ActiveModel {
        name: Set(DEFAULT_CATEGORY.to_string()),
        ..Default::default()
    };

    let result = category::Entity::insert(model)
        .on_conflict(
            OnConflict::column(category::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(inserted) if inserted > 0 => info!("Created default category '{}'", DEFAULT_CATEGORY),
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    category::Entity::find()
        .filter(category::Column::Name.eq(DEFAULT_CATEGORY))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("category '{DEFAULT_CATEGORY}'")))
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Category-filtered listing:
    // SELECT image_id FROM image_category WHERE category_id = ?
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_image_category_category")
        .table(image_category::Entity)
        .col(image_category::Column::CategoryId)
        .col(image_category::Column::ImageId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_image_category_category exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_image_category_category: {}", e);
        }
    }

    Ok(())
}
