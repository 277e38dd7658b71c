//! Handlers for the `/menus` resource (admin only).
//!
//! A menu's `location` decides which role's navigation it feeds, so every
//! write invalidates the navigation tag of the locations it touched.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_core::types::DbId;
use coursehub_db::models::menu::{CreateMenu, Menu, UpdateMenu};
use coursehub_db::repositories::MenuRepo;
use validator::Validate;

use crate::cache::navigation_tag;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Deleted, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/menus
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let menus = MenuRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: menus }))
}

/// GET /api/v1/menus/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let menu = find_menu(&state, id).await?;
    Ok(Json(DataResponse { data: menu }))
}

/// POST /api/v1/menus
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMenu>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let menu = MenuRepo::create(&state.pool, &input).await?;
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(
        menu_id = menu.id,
        location = %menu.location,
        user_id = admin.user_id,
        "Menu created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Menu created successfully", menu)),
    ))
}

/// PUT /api/v1/menus/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMenu>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let before = find_menu(&state, id).await?;
    let menu = MenuRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Menu", id }))?;

    state.cache.invalidate_tag(&navigation_tag(&before.location)).await;
    if menu.location != before.location {
        state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;
    }

    tracing::info!(menu_id = id, user_id = admin.user_id, "Menu updated");

    Ok(Json(MessageResponse::new("Menu updated successfully", menu)))
}

/// DELETE /api/v1/menus/{id}
///
/// Removes the menu and all of its items.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let menu = find_menu(&state, id).await?;
    if !MenuRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Menu", id }));
    }
    state.cache.invalidate_tag(&navigation_tag(&menu.location)).await;

    tracing::info!(menu_id = id, user_id = admin.user_id, "Menu deleted");

    Ok(Json(MessageResponse::new(
        "Menu deleted successfully",
        Deleted { id },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a menu or fail with 404.
pub(crate) async fn find_menu(state: &AppState, id: DbId) -> AppResult<Menu> {
    MenuRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Menu", id }))
}
