//! Click recording and aggregation service.

use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use serde_json::json;

/// Service for recording click events and counting them.
///
/// Click metadata is accepted as-is; validation is left to the store.
pub struct ClickService<C: ClickRepository + ?Sized> {
    repository: Arc<C>,
}

impl<C: ClickRepository + ?Sized> ClickService<C> {
    /// Creates a new click service.
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Records a click event.
    ///
    /// In production this is driven by the background worker
    /// ([`crate::domain::click_worker::run_click_worker`]); it is safe to call
    /// from any number of tasks at once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on any repository failure.
    pub async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let link_id = new_click.link_id;

        self.repository.create(new_click).await.map_err(|e| {
            AppError::storage(
                "Failed to record click",
                json!({
                    "operation": "record_click",
                    "link_id": link_id,
                    "reason": e.to_string(),
                    "transient": e.is_transient()
                }),
            )
        })
    }

    /// Counts clicks recorded against `link_id`. Zero when there are none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on any repository failure.
    pub async fn get_clicks_count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        self.repository.count_by_link_id(link_id).await.map_err(|e| {
            AppError::storage(
                format!("Failed to count clicks for link {link_id}"),
                json!({
                    "operation": "get_clicks_count_by_link_id",
                    "link_id": link_id,
                    "reason": e.to_string()
                }),
            )
        })
    }
}
