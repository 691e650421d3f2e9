//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, StoreError};

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    user_agent: Option<String>,
    referer: Option<String>,
    ip: Option<String>,
}

/// PostgreSQL repository for click events.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn create(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let r = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_id, clicked_at, user_agent, referer, ip)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, link_id, clicked_at, user_agent, referer, ip
            "#,
        )
        .bind(new_click.link_id)
        .bind(new_click.clicked_at)
        .bind(new_click.user_agent)
        .bind(new_click.referer)
        .bind(new_click.ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click::new(
            r.id,
            r.link_id,
            r.clicked_at,
            r.user_agent,
            r.referer,
            r.ip,
        ))
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
