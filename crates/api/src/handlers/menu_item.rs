//! Handlers for `/menus/{id}/items` (admin only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_core::types::DbId;
use coursehub_db::models::menu_item::{CreateMenuItem, ReorderMenuItems, UpdateMenuItem};
use coursehub_db::repositories::MenuItemRepo;
use serde_json::json;
use validator::Validate;

use super::menu::find_menu;
use crate::cache::navigation_tag;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted, MessageResponse};
use crate::state::AppState;

fn item_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Menu item",
        id,
    })
}

/// GET /api/v1/menus/{id}/items
///
/// Full item tree of the menu, inactive items included.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(menu_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_menu(&state, menu_id).await?;
    let tree = MenuItemRepo::tree(&state.pool, menu_id).await?;
    Ok(Json(DataResponse { data: tree }))
}

/// POST /api/v1/menus/{id}/items
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(menu_id): Path<DbId>,
    Json(input): Json<CreateMenuItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let menu = find_menu(&state, menu_id).await?;
    let item = MenuItemRepo::create(&state.pool, menu_id, &input).await?;
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(
        menu_id,
        item_id = item.id,
        user_id = admin.user_id,
        "Menu item created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Menu item created successfully", item)),
    ))
}

/// PUT /api/v1/menus/{id}/items/{item_id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((menu_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateMenuItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let menu = find_menu(&state, menu_id).await?;
    let item = MenuItemRepo::update(&state.pool, menu_id, item_id, &input)
        .await?
        .ok_or_else(|| item_not_found(item_id))?;
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(menu_id, item_id, user_id = admin.user_id, "Menu item updated");

    Ok(Json(MessageResponse::new(
        "Menu item updated successfully",
        item,
    )))
}

/// DELETE /api/v1/menus/{id}/items/{item_id}
///
/// Refused with 422 while the item has children.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((menu_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let menu = find_menu(&state, menu_id).await?;
    if !MenuItemRepo::delete(&state.pool, menu_id, item_id).await? {
        return Err(item_not_found(item_id));
    }
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(menu_id, item_id, user_id = admin.user_id, "Menu item deleted");

    Ok(Json(MessageResponse::new(
        "Menu item deleted successfully",
        Deleted { id: item_id },
    )))
}

/// POST /api/v1/menus/{id}/items/reorder
///
/// Confirms the batch only; the item tree is re-read with a GET.
pub async fn reorder(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(menu_id): Path<DbId>,
    Json(input): Json<ReorderMenuItems>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let menu = find_menu(&state, menu_id).await?;
    MenuItemRepo::reorder(&state.pool, menu_id, &input.items).await?;
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(
        menu_id,
        entries = input.items.len(),
        user_id = admin.user_id,
        "Menu items reordered"
    );

    Ok(Json(MessageResponse::new(
        "Menu items reordered successfully",
        json!({ "updated": input.items.len() }),
    )))
}
