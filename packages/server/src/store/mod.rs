//! Persistence operations over categories and images.
//!
//! Stores borrow any connection (pool or transaction) and open their own
//! transaction for multi-row mutations.

pub mod category;
pub mod image;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};

use crate::entity::category as category_entity;

/// Return the IDs in `ids` that have no matching category row, in input order.
pub async fn missing_category_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<i32>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found: Vec<i32> = category_entity::Entity::find()
        .select_only()
        .column(category_entity::Column::Id)
        .filter(category_entity::Column::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}
