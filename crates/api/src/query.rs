//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /navigation/menu`.
///
/// `path` is the page currently shown by the client; matching items are
/// flagged `is_active`.
#[derive(Debug, Default, Deserialize)]
pub struct NavigationParams {
    pub path: Option<String>,
}
