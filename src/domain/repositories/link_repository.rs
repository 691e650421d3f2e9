//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link and returns it with its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if the short code is already taken.
    /// Returns [`StoreError::Backend`] on any other store failure.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no link has this code.
    /// Returns [`StoreError::Backend`] on store failures.
    async fn get_by_short_code(&self, short_code: &str) -> Result<Link, StoreError>;

    /// Returns every link committed at call time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on store failures.
    async fn get_all(&self) -> Result<Vec<Link>, StoreError>;

    /// Counts the clicks recorded against `link_id`. Zero when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on store failures.
    async fn count_clicks_by_link_id(&self, link_id: i64) -> Result<i64, StoreError>;
}
