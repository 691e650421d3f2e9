#![allow(dead_code)]

use std::sync::Arc;

use sqlx::PgPool;
use url_shortener_core::application::services::{ClickService, CodePolicy, LinkService};
use url_shortener_core::config::{Config, MEMORY_DATABASE_URL};
use url_shortener_core::infrastructure::persistence::InMemoryStore;

pub struct MemoryServices {
    pub store: Arc<InMemoryStore>,
    pub link_service: Arc<LinkService<InMemoryStore>>,
    pub click_service: Arc<ClickService<InMemoryStore>>,
}

pub fn memory_services() -> MemoryServices {
    memory_services_with_policy(CodePolicy::default())
}

pub fn memory_services_with_policy(policy: CodePolicy) -> MemoryServices {
    let store = Arc::new(InMemoryStore::new());

    MemoryServices {
        link_service: Arc::new(LinkService::with_policy(store.clone(), policy)),
        click_service: Arc::new(ClickService::new(store.clone())),
        store,
    }
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (short_code, long_url) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_click(pool: &PgPool, link_id: i64, ip: &str) {
    sqlx::query("INSERT INTO clicks (link_id, ip) VALUES ($1, $2)")
        .bind(link_id)
        .bind(ip)
        .execute(pool)
        .await
        .unwrap();
}

pub fn memory_config() -> Config {
    Config {
        database_url: MEMORY_DATABASE_URL.to_string(),
        base_url: "http://sho.rt".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        click_queue_capacity: 16,
        click_worker_concurrency: 4,
        code_length: 8,
        code_max_retries: 5,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 1,
        db_max_lifetime: 1,
    }
}
