//! Handlers for the `/categories` resource.
//!
//! Reads are served from the tagged cache; every successful write drops the
//! `categories` tag so the next read rebuilds the tree.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_core::types::DbId;
use coursehub_db::models::category::{
    BulkDeleteCategories, CreateCategory, ReorderCategories, UpdateCategory,
};
use coursehub_db::repositories::CategoryRepo;
use serde_json::{json, Value};
use validator::Validate;

use crate::cache::CATEGORIES_TAG;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{BulkDeleteResponse, DataResponse, Deleted, MessageResponse};
use crate::state::AppState;

const TREE_CACHE_KEY: &str = "categories:tree";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// Category tree (roots and their children) with course counts.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tree = cached_tree(&state).await?;
    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id_with_count(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
///
/// Create a category at the end of its sibling group.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let category = CategoryRepo::create(&state.pool, &input).await?;
    state.cache.invalidate_tag(CATEGORIES_TAG).await;

    tracing::info!(
        category_id = category.id,
        user_id = admin.user_id,
        "Category created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Category created successfully", category)),
    ))
}

/// PUT /api/v1/categories/{id}
///
/// Update a category. A `parent_id` key moves it; `null` makes it a root.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    state.cache.invalidate_tag(CATEGORIES_TAG).await;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category updated");

    Ok(Json(MessageResponse::new(
        "Category updated successfully",
        category,
    )))
}

/// DELETE /api/v1/categories/{id}
///
/// Refused with 422 while the category has children or courses.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    state.cache.invalidate_tag(CATEGORIES_TAG).await;

    tracing::info!(category_id = id, user_id = admin.user_id, "Category deleted");

    Ok(Json(MessageResponse::new(
        "Category deleted successfully",
        Deleted { id },
    )))
}

/// POST /api/v1/categories/reorder
///
/// Apply a batch of order (and optional parent) changes atomically.
/// Callers re-fetch the tree with `GET /categories`.
pub async fn reorder(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ReorderCategories>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    CategoryRepo::reorder(&state.pool, &input.items).await?;
    state.cache.invalidate_tag(CATEGORIES_TAG).await;

    tracing::info!(
        entries = input.items.len(),
        user_id = admin.user_id,
        "Categories reordered"
    );

    Ok(Json(MessageResponse::new(
        "Categories reordered successfully",
        json!({ "updated": input.items.len() }),
    )))
}

/// POST /api/v1/categories/bulk-delete
///
/// Delete what can be deleted; report the rest in `errors`.
pub async fn bulk_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteCategories>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let outcome = CategoryRepo::bulk_delete(&state.pool, &input.ids).await?;
    if outcome.deleted > 0 {
        state.cache.invalidate_tag(CATEGORIES_TAG).await;
    }

    tracing::info!(
        deleted = outcome.deleted,
        blocked = outcome.errors.len(),
        user_id = admin.user_id,
        "Category bulk delete"
    );

    Ok(Json(BulkDeleteResponse {
        message: format!("{} categories deleted successfully", outcome.deleted),
        deleted: outcome.deleted,
        errors: outcome.errors,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve the rendered tree from cache, rebuilding it on a miss.
async fn cached_tree(state: &AppState) -> AppResult<Value> {
    if let Some(tree) = state.cache.get(TREE_CACHE_KEY).await {
        return Ok(tree);
    }

    let ticket = state.cache.ticket(&[CATEGORIES_TAG]).await;
    let tree = CategoryRepo::tree(&state.pool).await?;
    let rendered =
        serde_json::to_value(&tree).map_err(|e| AppError::InternalError(e.to_string()))?;
    state
        .cache
        .insert(TREE_CACHE_KEY, ticket, rendered.clone())
        .await;
    Ok(rendered)
}
