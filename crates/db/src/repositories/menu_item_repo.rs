//! Repository for the `menu_items` table.
//!
//! Items are always addressed through their menu: every query is scoped by
//! `menu_id`, and a parent must belong to the same menu as its child.

use coursehub_core::deletion::{check_deletable, DeletionCandidate};
use coursehub_core::error::CoreError;
use coursehub_core::hierarchy::check_reparent;
use coursehub_core::ordering::{next_sibling_order, plan_reorder, ReorderEntry};
use coursehub_core::tree::{build_forest, ParentMap, TreeBranch, MENU_ITEM};
use coursehub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::menu_item::{CreateMenuItem, MenuItem, UpdateMenuItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, menu_id, parent_id, title, url, target, icon, css_class, \
    is_active, sort_order, created_at, updated_at";

/// Provides CRUD and tree operations for menu items.
pub struct MenuItemRepo;

impl MenuItemRepo {
    /// Find an item of `menu_id` by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        menu_id: DbId,
        id: DbId,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_items WHERE id = $1 AND menu_id = $2");
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .bind(menu_id)
            .fetch_optional(pool)
            .await
    }

    /// List every item of a menu flat, ordered by sort_order, then id.
    pub async fn list_for_menu(pool: &PgPool, menu_id: DbId) -> Result<Vec<MenuItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM menu_items WHERE menu_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(menu_id)
            .fetch_all(pool)
            .await
    }

    /// Full item tree of a menu, including inactive items.
    pub async fn tree(
        pool: &PgPool,
        menu_id: DbId,
    ) -> Result<Vec<TreeBranch<MenuItem>>, sqlx::Error> {
        let items = Self::list_for_menu(pool, menu_id).await?;
        Ok(build_forest(items, None))
    }

    /// Item tree of a menu restricted to active items.
    ///
    /// Children of an inactive item are hidden along with it.
    pub async fn active_tree(
        pool: &PgPool,
        menu_id: DbId,
    ) -> Result<Vec<TreeBranch<MenuItem>>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM menu_items \
             WHERE menu_id = $1 AND is_active \
             ORDER BY sort_order, id"
        );
        let items = sqlx::query_as::<_, MenuItem>(&query)
            .bind(menu_id)
            .fetch_all(pool)
            .await?;
        Ok(build_forest(items, None))
    }

    /// Insert a new item at the end of its sibling group.
    pub async fn create(
        pool: &PgPool,
        menu_id: DbId,
        input: &CreateMenuItem,
    ) -> Result<MenuItem, RepoError> {
        let mut tx = pool.begin().await?;

        let menu = sqlx::query_scalar::<_, DbId>("SELECT id FROM menus WHERE id = $1 FOR SHARE")
            .bind(menu_id)
            .fetch_optional(&mut *tx)
            .await?;
        if menu.is_none() {
            return Err(CoreError::NotFound {
                entity: "Menu",
                id: menu_id,
            }
            .into());
        }

        if let Some(parent_id) = input.parent_id {
            let owner = sqlx::query_scalar::<_, DbId>(
                "SELECT menu_id FROM menu_items WHERE id = $1 FOR SHARE",
            )
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?;
            match owner {
                None => {
                    return Err(CoreError::Validation(format!(
                        "Parent menu item {parent_id} does not exist"
                    ))
                    .into())
                }
                Some(owner) if owner != menu_id => {
                    return Err(CoreError::Validation(format!(
                        "Parent menu item {parent_id} belongs to a different menu"
                    ))
                    .into())
                }
                Some(_) => {}
            }
        }

        let sort_order =
            next_sibling_order(max_sibling_order(&mut tx, menu_id, input.parent_id).await?);

        let query = format!(
            "INSERT INTO menu_items \
                (menu_id, parent_id, title, url, target, icon, css_class, is_active, sort_order) \
             VALUES ($1, $2, $3, COALESCE($4, '#'), COALESCE($5, '_self'), $6, $7, \
                COALESCE($8, true), $9) \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, MenuItem>(&query)
            .bind(menu_id)
            .bind(input.parent_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(&input.target)
            .bind(&input.icon)
            .bind(&input.css_class)
            .bind(input.is_active)
            .bind(sort_order)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Update an item of `menu_id`. Only non-`None` fields are applied.
    ///
    /// A parent change is validated against the locked items of the same
    /// menu and moves the item to the end of its new sibling group.
    /// Returns `None` if the menu has no item with the given `id`.
    pub async fn update(
        pool: &PgPool,
        menu_id: DbId,
        id: DbId,
        input: &UpdateMenuItem,
    ) -> Result<Option<MenuItem>, RepoError> {
        let mut tx = pool.begin().await?;
        let parents = lock_parent_map(&mut tx, menu_id).await?;

        let query = format!("SELECT {COLUMNS} FROM menu_items WHERE id = $1 AND menu_id = $2");
        let Some(current) = sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .bind(menu_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut new_sort_order = None;
        let move_to = input.parent_id.filter(|p| *p != current.parent_id);
        if let Some(new_parent) = move_to {
            check_reparent(&parents, id, new_parent)
                .map_err(|v| v.into_error(&MENU_ITEM.label(&current.title)))?;
            new_sort_order = Some(next_sibling_order(
                max_sibling_order(&mut tx, menu_id, new_parent).await?,
            ));
        }

        let update_query = format!(
            "UPDATE menu_items SET \
                title = COALESCE($3, title), \
                url = COALESCE($4, url), \
                target = COALESCE($5, target), \
                icon = COALESCE($6, icon), \
                css_class = COALESCE($7, css_class), \
                is_active = COALESCE($8, is_active), \
                parent_id = CASE WHEN $9::boolean THEN $10::bigint ELSE parent_id END, \
                sort_order = COALESCE($11, sort_order) \
             WHERE id = $1 AND menu_id = $2 \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, MenuItem>(&update_query)
            .bind(id)
            .bind(menu_id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(&input.target)
            .bind(&input.icon)
            .bind(&input.css_class)
            .bind(input.is_active)
            .bind(move_to.is_some())
            .bind(move_to.flatten())
            .bind(new_sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Delete an item that has no children.
    ///
    /// Returns `false` if the menu has no item with the given `id`.
    pub async fn delete(pool: &PgPool, menu_id: DbId, id: DbId) -> Result<bool, RepoError> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, (DbId, String)>(
            "SELECT id, title FROM menu_items WHERE id = $1 AND menu_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(menu_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((id, name)) = row else {
            return Ok(false);
        };

        // Counted after the lock is held so children attached by a
        // transaction that committed while we waited are seen.
        let child_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM menu_items WHERE parent_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        check_deletable(
            &MENU_ITEM,
            &DeletionCandidate {
                id,
                name,
                child_count,
                dependent_count: 0,
            },
        )?;

        sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply a reorder batch within one menu. Either every entry is written
    /// or none is; ids from other menus are reported as not found.
    pub async fn reorder(
        pool: &PgPool,
        menu_id: DbId,
        entries: &[ReorderEntry],
    ) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let parents = lock_parent_map(&mut tx, menu_id).await?;
        plan_reorder(&parents, entries, MENU_ITEM.name)?;

        for entry in entries {
            sqlx::query(
                "UPDATE menu_items SET \
                    sort_order = $3, \
                    parent_id = CASE WHEN $4::boolean THEN $5::bigint ELSE parent_id END \
                 WHERE id = $1 AND menu_id = $2",
            )
            .bind(entry.id)
            .bind(menu_id)
            .bind(entry.order)
            .bind(entry.moves())
            .bind(entry.parent_id.flatten())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(menu_id, entries = entries.len(), "Menu item reorder applied");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Read the parent links of one menu's items, locking the rows until commit.
async fn lock_parent_map(
    tx: &mut Transaction<'_, Postgres>,
    menu_id: DbId,
) -> Result<ParentMap, sqlx::Error> {
    let rows = sqlx::query_as::<_, (DbId, Option<DbId>)>(
        "SELECT id, parent_id FROM menu_items WHERE menu_id = $1 ORDER BY id FOR UPDATE",
    )
    .bind(menu_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Highest sort_order among the children of `parent_id` within a menu.
async fn max_sibling_order(
    tx: &mut Transaction<'_, Postgres>,
    menu_id: DbId,
    parent_id: Option<DbId>,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MAX(sort_order) FROM menu_items \
         WHERE menu_id = $1 AND parent_id IS NOT DISTINCT FROM $2",
    )
    .bind(menu_id)
    .bind(parent_id)
    .fetch_one(&mut **tx)
    .await
}
