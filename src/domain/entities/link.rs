//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted short link.
///
/// `id` and `created_at` are assigned by the store. A link is never updated
/// once created; `short_code` is unique across all links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, short_code: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            short_code,
            long_url,
            created_at,
        }
    }

    /// Builds the public short URL under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let link = Link::new(
            7,
            "Xy9k2Q".to_string(),
            "https://rust-lang.org".to_string(),
            Utc::now(),
        );

        assert_eq!(
            link.short_url("http://localhost:8080/"),
            "http://localhost:8080/Xy9k2Q"
        );
        assert_eq!(link.short_url("https://s.io"), "https://s.io/Xy9k2Q");
    }
}
