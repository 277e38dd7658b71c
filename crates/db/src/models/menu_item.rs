//! Menu item entity model and DTOs.

use coursehub_core::navigation::NavigationSource;
use coursehub_core::ordering::ReorderEntry;
use coursehub_core::tree::TreeNode;
use coursehub_core::types::{nullable_patch, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `menu_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuItem {
    pub id: DbId,
    pub menu_id: DbId,
    pub parent_id: Option<DbId>,
    pub title: String,
    pub url: String,
    pub target: String,
    pub icon: Option<String>,
    pub css_class: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeNode for MenuItem {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

impl NavigationSource for MenuItem {
    fn nav_id(&self) -> String {
        self.id.to_string()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn explicit_icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    fn css_class(&self) -> Option<&str> {
        self.css_class.as_deref()
    }
}

/// DTO for creating a menu item. The owning menu comes from the URL path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuItem {
    pub parent_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub target: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    #[validate(length(max = 255))]
    pub css_class: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a menu item. All fields optional.
///
/// `parent_id` distinguishes a missing key (keep the parent) from `null`
/// (move to the top level).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenuItem {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub target: Option<String>,
    #[validate(length(max = 64))]
    pub icon: Option<String>,
    #[validate(length(max = 255))]
    pub css_class: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub parent_id: Option<Option<DbId>>,
}

/// Request body for `POST /menus/{id}/items/reorder`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderMenuItems {
    #[validate(length(min = 1))]
    pub items: Vec<ReorderEntry>,
}
