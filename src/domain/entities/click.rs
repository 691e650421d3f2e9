//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A click event recorded against a link.
///
/// Client metadata is opaque to the core and stored as provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        user_agent: Option<String>,
        referer: Option<String>,
        ip: Option<String>,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            user_agent,
            referer,
            ip,
        }
    }
}

/// Input data for recording a new click event.
///
/// `link_id` should reference an existing link; the store decides whether a
/// dangling reference is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl NewClick {
    /// A click on `link_id` happening now, without client metadata.
    pub fn now(link_id: i64) -> Self {
        Self {
            link_id,
            clicked_at: Utc::now(),
            user_agent: None,
            referer: None,
            ip: None,
        }
    }
}
