use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A parent reassignment would make a node its own ancestor.
    #[error("Circular reference: {0}")]
    CircularReference(String),

    /// Deletion blocked because the node still has children.
    #[error("{0}")]
    HasChildren(String),

    /// Deletion blocked because content (e.g. courses) still references the node.
    #[error("{0}")]
    HasDependents(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
