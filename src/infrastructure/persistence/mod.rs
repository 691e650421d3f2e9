//! Store implementations of the domain repository traits.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval on PostgreSQL
//! - [`PgClickRepository`] - Click recording and counting on PostgreSQL
//! - [`InMemoryStore`] - Both traits backed by process memory

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_store::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;

use crate::domain::repositories::StoreError;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = e {
            return StoreError::NotFound;
        }

        if let Some(db) = e.as_database_error() {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }

        StoreError::Backend(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.is_transient());
    }
}
