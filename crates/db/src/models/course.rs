//! Course entity model.
//!
//! Courses are managed elsewhere in the LMS; this crate only needs them as
//! dependents that block category deletion.

use coursehub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub category_id: Option<DbId>,
    pub title: String,
    pub slug: String,
}
