//! Route definitions for role-based navigation.

use axum::routing::get;
use axum::Router;

use crate::handlers::navigation;
use crate::state::AppState;

/// Routes mounted at `/navigation`.
///
/// ```text
/// GET /menu?path=   -> menu
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/menu", get(navigation::menu))
}
