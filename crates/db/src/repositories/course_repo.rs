//! Repository for the `courses` table.

use coursehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, title, slug, created_at, updated_at";

/// Provides the course operations the category tree depends on.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (category_id, title, slug) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count courses filed under a category.
    pub async fn count_for_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await
    }

    /// Move a course to another category, or detach it with `None`.
    pub async fn reassign_category(
        pool: &PgPool,
        id: DbId,
        category_id: Option<DbId>,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET category_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(category_id)
            .fetch_optional(pool)
            .await
    }
}
