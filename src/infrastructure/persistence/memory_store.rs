//! In-process store implementing both repository traits.
//!
//! Enforces the same unique `short_code` index as the PostgreSQL schema, so it
//! rejects a racing duplicate insert exactly like the database would. Nothing
//! is persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository, StoreError};

#[derive(Debug, Default)]
struct Tables {
    links: Vec<Link>,
    by_code: HashMap<String, usize>,
    clicks: Vec<Click>,
    clicks_per_link: HashMap<i64, i64>,
}

/// Store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_count(&self) -> usize {
        self.tables.read().links.len()
    }

    pub fn click_count(&self) -> usize {
        self.tables.read().clicks.len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut tables = self.tables.write();

        if tables.by_code.contains_key(&new_link.short_code) {
            return Err(StoreError::UniqueViolation(
                "links_short_code_key".to_string(),
            ));
        }

        let link = Link::new(
            tables.links.len() as i64 + 1,
            new_link.short_code,
            new_link.long_url,
            Utc::now(),
        );

        let index = tables.links.len();
        tables.by_code.insert(link.short_code.clone(), index);
        tables.links.push(link.clone());

        Ok(link)
    }

    async fn get_by_short_code(&self, short_code: &str) -> Result<Link, StoreError> {
        let tables = self.tables.read();

        tables
            .by_code
            .get(short_code)
            .map(|&index| tables.links[index].clone())
            .ok_or(StoreError::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<Link>, StoreError> {
        Ok(self.tables.read().links.clone())
    }

    async fn count_clicks_by_link_id(&self, link_id: i64) -> Result<i64, StoreError> {
        Ok(self
            .tables
            .read()
            .clicks_per_link
            .get(&link_id)
            .copied()
            .unwrap_or(0))
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn create(&self, new_click: NewClick) -> Result<Click, StoreError> {
        let mut tables = self.tables.write();

        // Link ids are dense: the link at index `i` has id `i + 1`.
        if !(1..=tables.links.len() as i64).contains(&new_click.link_id) {
            return Err(StoreError::ForeignKeyViolation(
                "clicks_link_id_fkey".to_string(),
            ));
        }

        let click = Click::new(
            tables.clicks.len() as i64 + 1,
            new_click.link_id,
            new_click.clicked_at,
            new_click.user_agent,
            new_click.referer,
            new_click.ip,
        );

        *tables.clicks_per_link.entry(click.link_id).or_insert(0) += 1;
        tables.clicks.push(click.clone());

        Ok(click)
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, StoreError> {
        LinkRepository::count_clicks_by_link_id(self, link_id).await
    }
}
