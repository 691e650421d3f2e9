//! Error type returned by repository implementations.

/// Failure reported by a store backend.
///
/// "Record absent" and "operation failed" are disjoint: callers rely on
/// [`StoreError::NotFound`] to tell a free short code from a broken store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether repeating the operation may succeed. Constraint violations and
    /// missing records are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}
