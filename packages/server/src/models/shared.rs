use std::collections::HashSet;

use serde::Serialize;

use crate::error::ValidationIssue;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 256;

/// Plain acknowledgement body for mutations that return no entity.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category deleted successfully.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str, path: &str, issues: &mut Vec<ValidationIssue>) {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        issues.push(ValidationIssue::new(
            path,
            format!("Title must be 1-{MAX_TITLE_CHARS} characters"),
        ));
    }
}

/// Validate an ID list (positive, no duplicates). Empty lists are allowed.
pub fn validate_id_list(ids: &[i32], path: &str, issues: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    for (idx, &id) in ids.iter().enumerate() {
        if id <= 0 {
            issues.push(ValidationIssue::new(
                format!("{path}.{idx}"),
                format!("ID must be positive, got {id}"),
            ));
        } else if !seen.insert(id) {
            issues.push(ValidationIssue::new(
                format!("{path}.{idx}"),
                format!("Duplicate ID {id}"),
            ));
        }
    }
}

/// Turn collected issues into a result.
pub fn finish(issues: Vec<ValidationIssue>) -> Result<(), Vec<ValidationIssue>> {
    if issues.is_empty() { Ok(()) } else { Err(issues) }
}
