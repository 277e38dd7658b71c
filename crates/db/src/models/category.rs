//! Category entity model and DTOs.

use coursehub_core::ordering::ReorderEntry;
use coursehub_core::tree::TreeNode;
use coursehub_core::types::{nullable_patch, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category enriched with the number of courses filed under it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,
    pub course_count: i64,
}

impl TreeNode for CategoryWithCount {
    fn id(&self) -> DbId {
        self.category.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.category.parent_id
    }

    fn sort_order(&self) -> i32 {
        self.category.sort_order
    }
}

/// DTO for creating a new category.
///
/// `sort_order` is not accepted: new categories are appended to their
/// sibling group. A missing `slug` is derived from `name`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub parent_id: Option<DbId>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a category. All fields optional.
///
/// `parent_id` distinguishes a missing key (keep the parent) from `null`
/// (move to the top level).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub parent_id: Option<Option<DbId>>,
}

/// Request body for `POST /categories/reorder`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderCategories {
    #[validate(length(min = 1))]
    pub items: Vec<ReorderEntry>,
}

/// Request body for `POST /categories/bulk-delete`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkDeleteCategories {
    #[validate(length(min = 1))]
    pub ids: Vec<DbId>,
}

/// Result of a bulk delete: how many rows went, and why the rest stayed.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteOutcome {
    pub deleted: u64,
    pub errors: Vec<String>,
}
