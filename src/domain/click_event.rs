//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// A click waiting in the queue to be persisted.
///
/// Created by the caller that served the redirect and sent over a bounded
/// channel to [`crate::domain::click_worker::run_click_worker`], so the caller
/// never waits on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     Some("https://google.com"),
    /// );
    /// ```
    pub fn new(
        link_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            clicked_at: Utc::now(),
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            link_id: event.link_id,
            clicked_at: event.clicked_at,
            user_agent: event.user_agent,
            referer: event.referer,
            ip: event.ip,
        }
    }
}
