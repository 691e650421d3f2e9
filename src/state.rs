//! Shared application state handed to callers of the core.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::application::services::{ClickService, LinkService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Services and the click queue, cheap to clone across tasks.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub click_service: Arc<ClickService<dyn ClickRepository>>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<dyn LinkRepository>>,
        click_service: Arc<ClickService<dyn ClickRepository>>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: String,
    ) -> Self {
        Self {
            link_service,
            click_service,
            click_sender,
            base_url,
        }
    }

    /// Enqueues a click for the background worker without waiting.
    ///
    /// Returns `false` if the event was dropped because the queue is full or
    /// the worker has stopped.
    pub fn track_click(&self, event: ClickEvent) -> bool {
        match self.click_sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!(link_id = event.link_id, "Click queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(link_id = event.link_id, "Click worker stopped, dropping event");
                false
            }
        }
    }
}
