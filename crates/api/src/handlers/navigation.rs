//! Handler for the role-resolved navigation menu.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use coursehub_core::navigation::{fallback_navigation, from_forest, mark_active, NavItem};
use coursehub_core::roles::{is_known_role, navigation_location};
use coursehub_db::repositories::{MenuItemRepo, MenuRepo};

use crate::cache::navigation_tag;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::NavigationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/navigation/menu?path=
///
/// Navigation for the caller's role: the active menu at
/// `{role}_navigation` if there is one, the built-in table otherwise.
pub async fn menu(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<NavigationParams>,
) -> AppResult<impl IntoResponse> {
    let mut items = resolve(&state, &user.role).await?;
    if let Some(path) = params.path.as_deref() {
        mark_active(&mut items, path);
    }
    Ok(Json(DataResponse { data: items }))
}

/// Resolve (and cache) the unmarked navigation tree for `role`.
async fn resolve(state: &AppState, role: &str) -> AppResult<Vec<NavItem>> {
    let location = navigation_location(role);
    let cache_key = format!("nav:{location}");

    if let Some(cached) = state.cache.get(&cache_key).await {
        return serde_json::from_value(cached).map_err(|e| AppError::InternalError(e.to_string()));
    }

    let tag = navigation_tag(&location);
    let ticket = state.cache.ticket(&[tag.as_str()]).await;
    let items = match MenuRepo::find_active_by_location(&state.pool, &location).await? {
        Some(menu) => {
            let forest = MenuItemRepo::active_tree(&state.pool, menu.id).await?;
            tracing::debug!(menu_id = menu.id, %location, "Navigation resolved from menu");
            from_forest(forest)
        }
        None => {
            tracing::debug!(
                %location,
                known_role = is_known_role(role),
                "No active menu, using built-in navigation"
            );
            fallback_navigation(role)
        }
    };

    let rendered =
        serde_json::to_value(&items).map_err(|e| AppError::InternalError(e.to_string()))?;
    state.cache.insert(cache_key, ticket, rendered).await;

    Ok(items)
}
