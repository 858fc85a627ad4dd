use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// Object key in the bucket. Immutable once written.
    #[sea_orm(unique)]
    pub storage_key: String,

    /// Public retrieval URL derived from the bucket and key.
    #[sea_orm(column_type = "Text")]
    pub url: String,

    #[sea_orm(has_many, via = "image_category")]
    pub categories: HasMany<super::category::Entity>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
