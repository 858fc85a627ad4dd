use serde::{Deserialize, Serialize};

use crate::entity::category;
use crate::error::ValidationIssue;

use super::shared::finish;

/// Maximum category name length in characters.
pub const MAX_CATEGORY_NAME_CHARS: usize = 128;

/// Request body for creating a category.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    /// Unique category name (1-128 characters, trimmed).
    #[schema(example = "Landscapes")]
    pub name: String,
}

/// A category as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Landscapes")]
    pub name: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let name = req.name.trim();
    if name.is_empty() {
        issues.push(ValidationIssue::new("name", "Category name cannot be empty."));
    } else if name.chars().count() > MAX_CATEGORY_NAME_CHARS {
        issues.push(ValidationIssue::new(
            "name",
            format!("Category name must be at most {MAX_CATEGORY_NAME_CHARS} characters"),
        ));
    }
    finish(issues)
}
