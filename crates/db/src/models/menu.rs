//! Menu entity model and DTOs.

use coursehub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `menus` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Menu {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new menu.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenu {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    pub is_active: Option<bool>,
}

/// DTO for updating a menu. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenu {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,
    pub is_active: Option<bool>,
}
