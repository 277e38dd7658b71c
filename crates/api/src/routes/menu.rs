//! Route definitions for menus and their items.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{menu, menu_item};
use crate::state::AppState;

/// Routes mounted at `/menus`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// GET    /{id}/items              -> item tree
/// POST   /{id}/items              -> create item
/// POST   /{id}/items/reorder      -> reorder items
/// PUT    /{id}/items/{item_id}    -> update item
/// DELETE /{id}/items/{item_id}    -> delete item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::list).post(menu::create))
        .route(
            "/{id}",
            get(menu::get_by_id).put(menu::update).delete(menu::delete),
        )
        .route("/{id}/items", get(menu_item::list).post(menu_item::create))
        .route("/{id}/items/reorder", post(menu_item::reorder))
        .route(
            "/{id}/items/{item_id}",
            put(menu_item::update).delete(menu_item::delete),
        )
}
