//! Repository for the `categories` table.
//!
//! Every mutation that touches the hierarchy runs in one transaction and
//! re-reads the parent links under row locks before writing, so the cycle
//! and deletion checks see the same state the write is applied to.

use std::collections::HashMap;

use coursehub_core::deletion::{check_deletable, partition_bulk, DeletionCandidate};
use coursehub_core::error::CoreError;
use coursehub_core::hierarchy::check_reparent;
use coursehub_core::ordering::{next_sibling_order, plan_reorder, ReorderEntry};
use coursehub_core::slug::{slugify, validate_slug};
use coursehub_core::tree::{build_forest, ParentMap, TreeBranch, CATEGORY};
use coursehub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::RepoError;
use crate::models::category::{
    BulkDeleteOutcome, Category, CategoryWithCount, CreateCategory, UpdateCategory,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, parent_id, name, slug, description, icon, is_active, \
    sort_order, created_at, updated_at";

/// Column list for queries aliased as `c`, including the course count.
const COUNT_COLUMNS: &str = "c.id, c.parent_id, c.name, c.slug, c.description, c.icon, \
    c.is_active, c.sort_order, c.created_at, c.updated_at, \
    (SELECT COUNT(*) FROM courses co WHERE co.category_id = c.id) AS course_count";

/// Levels materialized by [`CategoryRepo::tree`]: roots and their children.
pub const CATEGORY_TREE_DEPTH: usize = 2;

/// Provides CRUD and tree operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by ID together with its course count.
    pub async fn find_by_id_with_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryWithCount>, sqlx::Error> {
        let query = format!("SELECT {COUNT_COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every category flat, ordered by sort_order, then id.
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        let query =
            format!("SELECT {COUNT_COLUMNS} FROM categories c ORDER BY c.sort_order, c.id");
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Load all categories as a nested tree of depth [`CATEGORY_TREE_DEPTH`].
    pub async fn tree(pool: &PgPool) -> Result<Vec<TreeBranch<CategoryWithCount>>, sqlx::Error> {
        let rows = Self::list(pool).await?;
        Ok(build_forest(rows, Some(CATEGORY_TREE_DEPTH)))
    }

    /// Insert a new category at the end of its sibling group.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, RepoError> {
        let slug = match &input.slug {
            Some(slug) => {
                validate_slug(slug)?;
                slug.clone()
            }
            None => slugify(&input.name),
        };
        if slug.is_empty() {
            return Err(CoreError::Validation(format!(
                "Cannot derive a slug from name '{}'",
                input.name
            ))
            .into());
        }

        let mut tx = pool.begin().await?;

        if let Some(parent_id) = input.parent_id {
            let parent = sqlx::query_scalar::<_, DbId>(
                "SELECT id FROM categories WHERE id = $1 FOR SHARE",
            )
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?;
            if parent.is_none() {
                return Err(CoreError::Validation(format!(
                    "Parent category {parent_id} does not exist"
                ))
                .into());
            }
        }

        ensure_unique(&mut tx, Some(input.name.as_str()), Some(slug.as_str()), None).await?;

        let sort_order = next_sibling_order(max_sibling_order(&mut tx, input.parent_id).await?);

        let query = format!(
            "INSERT INTO categories (parent_id, name, slug, description, icon, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, true), $7) \
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(input.parent_id)
            .bind(&input.name)
            .bind(&slug)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.is_active)
            .bind(sort_order)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Update a category. Only non-`None` fields are applied.
    ///
    /// A parent change is validated against the locked hierarchy and moves
    /// the category to the end of its new sibling group.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, RepoError> {
        if let Some(slug) = &input.slug {
            validate_slug(slug)?;
        }

        let mut tx = pool.begin().await?;
        let parents = lock_parent_map(&mut tx).await?;

        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        let Some(current) = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut new_sort_order = None;
        let move_to = input.parent_id.filter(|p| *p != current.parent_id);
        if let Some(new_parent) = move_to {
            check_reparent(&parents, id, new_parent)
                .map_err(|v| v.into_error(&CATEGORY.label(&current.name)))?;
            new_sort_order =
                Some(next_sibling_order(max_sibling_order(&mut tx, new_parent).await?));
        }

        ensure_unique(&mut tx, input.name.as_deref(), input.slug.as_deref(), Some(id)).await?;

        let update_query = format!(
            "UPDATE categories SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                icon = COALESCE($5, icon), \
                is_active = COALESCE($6, is_active), \
                parent_id = CASE WHEN $7::boolean THEN $8::bigint ELSE parent_id END, \
                sort_order = COALESCE($9, sort_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&update_query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.is_active)
            .bind(move_to.is_some())
            .bind(move_to.flatten())
            .bind(new_sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Delete a category that has no children and no courses.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let mut tx = pool.begin().await?;

        let Some(candidate) = lock_candidates(&mut tx, &[id]).await?.pop() else {
            return Ok(false);
        };
        check_deletable(&CATEGORY, &candidate)?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete every requested category that passes the deletion guard.
    ///
    /// Blocked and unknown ids are skipped and reported in `errors`; the
    /// rest are removed in a single transaction.
    pub async fn bulk_delete(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<BulkDeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let candidates = lock_candidates(&mut tx, ids).await?;
        let plan = partition_bulk(&CATEGORY, ids, candidates);

        let deleted = if plan.deletable.is_empty() {
            0
        } else {
            sqlx::query("DELETE FROM categories WHERE id = ANY($1)")
                .bind(&plan.deletable)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        };

        tx.commit().await?;

        tracing::debug!(
            requested = ids.len(),
            deleted,
            blocked = plan.blocked.len(),
            "Category bulk delete applied"
        );

        Ok(BulkDeleteOutcome {
            deleted,
            errors: plan.blocked,
        })
    }

    /// Apply a reorder batch. Either every entry is written or none is.
    pub async fn reorder(pool: &PgPool, entries: &[ReorderEntry]) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let parents = lock_parent_map(&mut tx).await?;
        plan_reorder(&parents, entries, CATEGORY.name)?;

        for entry in entries {
            sqlx::query(
                "UPDATE categories SET \
                    sort_order = $2, \
                    parent_id = CASE WHEN $3::boolean THEN $4::bigint ELSE parent_id END \
                 WHERE id = $1",
            )
            .bind(entry.id)
            .bind(entry.order)
            .bind(entry.moves())
            .bind(entry.parent_id.flatten())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(entries = entries.len(), "Category reorder applied");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Read every category's parent link, locking the rows until commit.
async fn lock_parent_map(tx: &mut Transaction<'_, Postgres>) -> Result<ParentMap, sqlx::Error> {
    let rows = sqlx::query_as::<_, (DbId, Option<DbId>)>(
        "SELECT id, parent_id FROM categories ORDER BY id FOR UPDATE",
    )
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Highest sort_order among the children of `parent_id` (`None` = roots).
async fn max_sibling_order(
    tx: &mut Transaction<'_, Postgres>,
    parent_id: Option<DbId>,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MAX(sort_order) FROM categories WHERE parent_id IS NOT DISTINCT FROM $1",
    )
    .bind(parent_id)
    .fetch_one(&mut **tx)
    .await
}

/// Lock the requested categories and count what hangs off each of them.
///
/// The counts run in a second statement: under READ COMMITTED it takes a
/// fresh snapshot, so a reparent or course insert that committed while this
/// transaction waited for the row locks is counted.
async fn lock_candidates(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> Result<Vec<DeletionCandidate>, sqlx::Error> {
    let locked = sqlx::query_as::<_, (DbId, String)>(
        "SELECT id, name FROM categories WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
    .bind(ids)
    .fetch_all(&mut **tx)
    .await?;
    if locked.is_empty() {
        return Ok(Vec::new());
    }

    let locked_ids: Vec<DbId> = locked.iter().map(|(id, _)| *id).collect();
    let counts: HashMap<DbId, (i64, i64)> = sqlx::query_as::<_, (DbId, i64, i64)>(
        "SELECT c.id, \
            (SELECT COUNT(*) FROM categories ch WHERE ch.parent_id = c.id), \
            (SELECT COUNT(*) FROM courses co WHERE co.category_id = c.id) \
         FROM categories c \
         WHERE c.id = ANY($1)",
    )
    .bind(&locked_ids)
    .fetch_all(&mut **tx)
    .await?
    .into_iter()
    .map(|(id, children, courses)| (id, (children, courses)))
    .collect();

    Ok(locked
        .into_iter()
        .map(|(id, name)| {
            let (child_count, dependent_count) = counts.get(&id).copied().unwrap_or_default();
            DeletionCandidate {
                id,
                name,
                child_count,
                dependent_count,
            }
        })
        .collect())
}

/// Reject a name or slug already used by another category.
async fn ensure_unique(
    tx: &mut Transaction<'_, Postgres>,
    name: Option<&str>,
    slug: Option<&str>,
    exclude_id: Option<DbId>,
) -> Result<(), RepoError> {
    let clash = sqlx::query_as::<_, (String, String)>(
        "SELECT name, slug FROM categories \
         WHERE (name = $1 OR slug = $2) AND id IS DISTINCT FROM $3 \
         LIMIT 1",
    )
    .bind(name)
    .bind(slug)
    .bind(exclude_id)
    .fetch_optional(&mut **tx)
    .await?;

    match clash {
        Some((existing, _)) if Some(existing.as_str()) == name => Err(CoreError::Conflict(
            format!("Category name '{existing}' is already taken"),
        )
        .into()),
        Some((_, existing)) => Err(CoreError::Conflict(format!(
            "Category slug '{existing}' is already taken"
        ))
        .into()),
        None => Ok(()),
    }
}
