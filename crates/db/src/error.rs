use coursehub_core::error::CoreError;

/// Error returned by repository operations that enforce tree rules inside
/// their own transaction.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A business rule (cycle, missing parent, deletion guard) was violated.
    #[error(transparent)]
    Rule(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
