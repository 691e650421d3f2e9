//! Application error taxonomy shared by services and the CLI.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorInfo<'a>,
}

#[derive(Serialize)]
struct ErrorInfo<'a> {
    code: &'static str,
    message: &'a str,
    details: &'a Value,
}

/// Errors surfaced by the service layer.
///
/// Every variant carries a human-readable message and structured details
/// (operation name, key) so callers can diagnose failures without seeing
/// store-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidArgument { message: String, details: Value },
    #[error("{message}")]
    RandomSource { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Storage { message: String, details: Value },
    #[error("{message}")]
    ExhaustedRetries { message: String, details: Value },
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details,
        }
    }
    pub fn random_source(message: impl Into<String>, details: Value) -> Self {
        Self::RandomSource {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn exhausted_retries(message: impl Into<String>, details: Value) -> Self {
        Self::ExhaustedRetries {
            message: message.into(),
            details,
        }
    }

    /// Maps a repository failure into the service taxonomy.
    ///
    /// [`StoreError::NotFound`] becomes [`AppError::NotFound`]; every other
    /// store failure becomes [`AppError::Storage`]. The `operation` name and the
    /// store's reason are merged into `details`.
    pub fn from_store(err: StoreError, operation: &'static str, details: Value) -> Self {
        let mut details = match details {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("context".to_string(), other);
                map
            }
        };
        details.insert("operation".to_string(), json!(operation));

        match err {
            StoreError::NotFound => Self::not_found("Record not found", Value::Object(details)),
            other => {
                details.insert("reason".to_string(), json!(other.to_string()));
                details.insert("transient".to_string(), json!(other.is_transient()));
                Self::storage(
                    format!("Storage failure during {operation}"),
                    Value::Object(details),
                )
            }
        }
    }

    /// Whether the failed operation may succeed if repeated.
    ///
    /// Only [`AppError::Storage`] built from a transient store failure qualifies.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Storage { details, .. } if details["transient"] == true)
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "invalid_argument",
            AppError::RandomSource { .. } => "random_source_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Storage { .. } => "storage_error",
            AppError::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            AppError::InvalidArgument { details, .. }
            | AppError::RandomSource { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Storage { details, .. }
            | AppError::ExhaustedRetries { details, .. } => details,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::InvalidArgument { message, .. }
            | AppError::RandomSource { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Storage { message, .. }
            | AppError::ExhaustedRetries { message, .. } => message,
        }
    }

    /// Renders the error as a JSON document for machine consumers.
    pub fn to_json(&self) -> Value {
        let body = ErrorBody {
            error: ErrorInfo {
                code: self.code(),
                message: self.message(),
                details: self.details(),
            },
        };

        serde_json::to_value(body).unwrap_or_else(|_| json!({ "error": { "code": self.code() } }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_not_found_keeps_context() {
        let err = AppError::from_store(
            StoreError::NotFound,
            "get_link_by_short_code",
            json!({ "short_code": "abc123" }),
        );

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.details()["short_code"], "abc123");
        assert_eq!(err.details()["operation"], "get_link_by_short_code");
    }

    #[test]
    fn test_from_store_unique_violation_is_storage() {
        let err = AppError::from_store(
            StoreError::UniqueViolation("links_short_code_key".to_string()),
            "create_link",
            json!({ "short_code": "abc123" }),
        );

        assert!(matches!(err, AppError::Storage { .. }));
        assert!(
            err.details()["reason"]
                .as_str()
                .unwrap()
                .contains("links_short_code_key")
        );
        assert!(err.to_string().contains("create_link"));
    }

    #[test]
    fn test_from_store_wraps_non_object_details() {
        let err = AppError::from_store(
            StoreError::Backend("connection reset".to_string()),
            "count_clicks",
            json!(42),
        );

        assert_eq!(err.details()["context"], 42);
        assert_eq!(err.code(), "storage_error");
    }

    #[test]
    fn test_only_backend_storage_failures_are_transient() {
        let backend = AppError::from_store(
            StoreError::Backend("connection reset".to_string()),
            "get_all_links",
            json!({}),
        );
        let unique = AppError::from_store(
            StoreError::UniqueViolation("links_short_code_key".to_string()),
            "create_link",
            json!({}),
        );
        let not_found = AppError::from_store(StoreError::NotFound, "get_link", json!({}));

        assert!(backend.is_transient());
        assert!(!unique.is_transient());
        assert!(!not_found.is_transient());
        assert!(!AppError::invalid_argument("bad", json!({})).is_transient());
    }

    #[test]
    fn test_to_json_shape() {
        let err = AppError::exhausted_retries("Failed", json!({ "attempts": 5 }));
        let body = err.to_json();

        assert_eq!(body["error"]["code"], "exhausted_retries");
        assert_eq!(body["error"]["message"], "Failed");
        assert_eq!(body["error"]["details"]["attempts"], 5);
    }
}
