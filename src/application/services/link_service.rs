//! Link creation and retrieval service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

/// Default number of generate-and-check attempts per link.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Short code allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePolicy {
    pub code_length: i32,
    pub max_retries: u32,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// A link together with its total click count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: i64,
}

/// Service for creating and retrieving shortened links.
///
/// Uniqueness of short codes is checked against the store before insert.
/// The check and the insert are not atomic; a concurrent insert of the same
/// code is rejected by the store's unique index and reported as
/// [`AppError::Storage`].
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    policy: CodePolicy,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service with the default [`CodePolicy`].
    pub fn new(link_repository: Arc<L>) -> Self {
        Self::with_policy(link_repository, CodePolicy::default())
    }

    pub fn with_policy(link_repository: Arc<L>, policy: CodePolicy) -> Self {
        Self {
            link_repository,
            policy,
        }
    }

    pub fn policy(&self) -> CodePolicy {
        self.policy
    }

    /// Creates a short link for `long_url`.
    ///
    /// The URL is stored as given.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidArgument`] / [`AppError::RandomSource`] from the code generator
    /// - [`AppError::ExhaustedRetries`] if every generated code collided
    /// - [`AppError::Storage`] if the uniqueness check or the insert fails,
    ///   including a unique-index rejection caused by a concurrent insert
    pub async fn create_link(&self, long_url: &str) -> Result<Link, AppError> {
        let short_code = self.generate_unique_code().await?;

        let new_link = NewLink {
            short_code: short_code.clone(),
            long_url: long_url.to_string(),
        };

        let link = self.link_repository.create(new_link).await.map_err(|e| {
            warn!(short_code = %short_code, error = %e, "Failed to persist link");
            // Not-found has no meaning for an insert.
            let e = match e {
                StoreError::NotFound => StoreError::Backend("insert reported missing record".into()),
                other => other,
            };
            AppError::from_store(e, "create_link", json!({ "short_code": short_code }))
        })?;

        metrics::counter!("links_created_total").increment(1);
        info!(link_id = link.id, short_code = %link.short_code, "Link created");

        Ok(link)
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn get_link_by_short_code(&self, short_code: &str) -> Result<Link, AppError> {
        self.link_repository
            .get_by_short_code(short_code)
            .await
            .map_err(|e| {
                AppError::from_store(
                    e,
                    "get_link_by_short_code",
                    json!({ "short_code": short_code }),
                )
            })
    }

    /// Returns the link for `short_code` and its total click count.
    ///
    /// A link without clicks yields `total_clicks == 0`.
    ///
    /// # Errors
    ///
    /// Lookup errors are propagated from [`Self::get_link_by_short_code`].
    /// Returns [`AppError::Storage`] if counting fails.
    pub async fn get_link_stats(&self, short_code: &str) -> Result<LinkStats, AppError> {
        let link = self.get_link_by_short_code(short_code).await?;

        let total_clicks = self
            .link_repository
            .count_clicks_by_link_id(link.id)
            .await
            .map_err(|e| {
                // The link exists, so an absent row here is a store failure.
                let e = match e {
                    StoreError::NotFound => StoreError::Backend("click count unavailable".into()),
                    other => other,
                };
                AppError::from_store(
                    e,
                    "count_clicks_by_link_id",
                    json!({ "short_code": short_code, "link_id": link.id }),
                )
            })?;

        Ok(LinkStats { link, total_clicks })
    }

    /// Returns every link in the store. Used by the health monitor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn get_all_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .get_all()
            .await
            .map_err(|e| AppError::from_store(e, "get_all_links", json!({})))
    }

    /// Generates a short code no existing link uses.
    ///
    /// Tries up to `policy.max_retries` codes. Only a not-found lookup accepts a
    /// code; any other lookup failure aborts.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        let max_retries = self.policy.max_retries;

        for attempt in 1..=max_retries {
            let code = generate_code(self.policy.code_length)?;

            match self.link_repository.get_by_short_code(&code).await {
                Err(StoreError::NotFound) => return Ok(code),
                Ok(_) => {
                    metrics::counter!("short_code_collisions_total").increment(1);
                    debug!(
                        short_code = %code,
                        attempt,
                        max_retries,
                        "Short code collision, retrying"
                    );
                }
                Err(e) => {
                    return Err(AppError::from_store(
                        e,
                        "check_short_code",
                        json!({ "short_code": code, "attempt": attempt }),
                    ));
                }
            }
        }

        warn!(max_retries, "Exhausted short code attempts");

        Err(AppError::exhausted_retries(
            "Failed to generate a unique short code",
            json!({ "attempts": max_retries, "code_length": self.policy.code_length }),
        ))
    }
}
