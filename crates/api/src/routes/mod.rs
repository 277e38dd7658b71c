pub mod category;
pub mod health;
pub mod menu;
pub mod navigation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                 tree (any), create (admin)
/// /categories/reorder                         batch reorder (admin)
/// /categories/bulk-delete                     bulk delete (admin)
/// /categories/{id}                            get (any), update, delete (admin)
///
/// /menus                                      list, create (admin)
/// /menus/{id}                                 get, update, delete (admin)
/// /menus/{id}/items                           item tree, create item (admin)
/// /menus/{id}/items/reorder                   batch reorder (admin)
/// /menus/{id}/items/{item_id}                 update, delete item (admin)
///
/// /navigation/menu                            role-resolved navigation (any)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/menus", menu::router())
        .nest("/navigation", navigation::router())
}
