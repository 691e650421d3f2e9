//! Store connection, migrations and click worker startup.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::application::services::{ClickService, LinkService};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{InMemoryStore, PgClickRepository, PgLinkRepository};
use crate::state::AppState;

/// Running core: shared state plus the background click worker.
pub struct Runtime {
    pub state: AppState,
    shutdown: watch::Sender<bool>,
    click_worker: JoinHandle<()>,
}

impl Runtime {
    /// Closes the click queue and waits until every queued click is written.
    ///
    /// Clones of [`AppState`] may outlive this call; their
    /// [`AppState::track_click`] returns `false` once the queue is closed.
    pub async fn shutdown(self) -> Result<()> {
        // Fails only if the worker has already exited.
        let _ = self.shutdown.send(true);
        drop(self.state);
        self.click_worker
            .await
            .context("Click worker terminated abnormally")?;
        tracing::info!("Click queue drained");
        Ok(())
    }
}

/// Opens a PostgreSQL pool using the pool settings from `config`.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Applies pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate")?;

    tracing::info!("Migrations applied");
    Ok(())
}

/// Connects the configured store, builds the services and starts the click worker.
///
/// # Errors
///
/// Returns an error if the database connection or migrations fail.
pub async fn start(config: &Config) -> Result<Runtime> {
    let link_repository: Arc<dyn LinkRepository>;
    let click_repository: Arc<dyn ClickRepository>;

    if config.is_memory_store() {
        tracing::info!("Using in-memory store");
        let store = Arc::new(InMemoryStore::new());
        link_repository = store.clone();
        click_repository = store;
    } else {
        let pool = connect_pool(config).await?;
        run_migrations(&pool).await?;
        let pool = Arc::new(pool);
        link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        click_repository = Arc::new(PgClickRepository::new(pool));
    }

    let link_service = Arc::new(LinkService::with_policy(
        link_repository,
        config.code_policy(),
    ));
    let click_service = Arc::new(ClickService::new(click_repository));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let (shutdown, shutdown_rx) = watch::channel(false);
    let click_worker = tokio::spawn(run_click_worker(
        click_rx,
        click_service.clone(),
        config.click_worker_concurrency,
        shutdown_rx,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(
        link_service,
        click_service,
        click_tx,
        config.base_url.clone(),
    );

    Ok(Runtime {
        state,
        shutdown,
        click_worker,
    })
}
