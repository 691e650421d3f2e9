//! Repository trait for click events.

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for click tracking.
///
/// Implementations must tolerate concurrent `create` calls from many workers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a new click event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ForeignKeyViolation`] if no link has `link_id`.
    /// Returns [`StoreError::Backend`] on any other store failure.
    async fn create(&self, new_click: NewClick) -> Result<Click, StoreError>;

    /// Counts the clicks recorded against `link_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on store failures.
    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, StoreError>;
}
