//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    long_url: String,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.short_code, r.long_url, r.created_at)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Relies on the `links_short_code_key` unique constraint as the last line of
/// defence against duplicate codes.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (short_code, long_url)
            VALUES ($1, $2)
            RETURNING id, short_code, long_url, created_at
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.long_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn get_by_short_code(&self, short_code: &str) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, short_code, long_url, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or(StoreError::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<Link>, StoreError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, short_code, long_url, created_at
            FROM links
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count_clicks_by_link_id(&self, link_id: i64) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
