use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the sentinel category every new image falls back to.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many, via = "image_category")]
    pub images: HasMany<super::image::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
