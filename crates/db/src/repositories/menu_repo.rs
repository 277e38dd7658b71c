//! Repository for the `menus` table.

use coursehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::menu::{CreateMenu, Menu, UpdateMenu};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, location, is_active, created_at, updated_at";

/// Provides CRUD operations for menus.
pub struct MenuRepo;

impl MenuRepo {
    /// Insert a new menu, returning the created row.
    ///
    /// A second active menu for the same location violates
    /// `uq_menus_active_location`.
    pub async fn create(pool: &PgPool, input: &CreateMenu) -> Result<Menu, sqlx::Error> {
        let query = format!(
            "INSERT INTO menus (name, location, is_active) \
             VALUES ($1, $2, COALESCE($3, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Menu>(&query)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a menu by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Menu>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus WHERE id = $1");
        sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active menu bound to `location`, if any.
    pub async fn find_active_by_location(
        pool: &PgPool,
        location: &str,
    ) -> Result<Option<Menu>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM menus WHERE location = $1 AND is_active LIMIT 1");
        sqlx::query_as::<_, Menu>(&query)
            .bind(location)
            .fetch_optional(pool)
            .await
    }

    /// List all menus ordered by location, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Menu>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus ORDER BY location, name, id");
        sqlx::query_as::<_, Menu>(&query).fetch_all(pool).await
    }

    /// Update a menu. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMenu,
    ) -> Result<Option<Menu>, sqlx::Error> {
        let query = format!(
            "UPDATE menus SET \
                name = COALESCE($2, name), \
                location = COALESCE($3, location), \
                is_active = COALESCE($4, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a menu together with all of its items.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
