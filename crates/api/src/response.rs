//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope; mutations add a human-readable
//! `message` next to the data.

use coursehub_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ..., "data": T }` envelope returned by mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> MessageResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Payload of a successful single delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: DbId,
}

/// Body of `POST /categories/bulk-delete`.
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted: u64,
    pub errors: Vec<String>,
}
