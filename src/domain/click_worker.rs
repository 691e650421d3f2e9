//! Background worker persisting queued click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, watch};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Retries after the first failed write.
const MAX_WRITE_RETRIES: usize = 3;

/// Drains `rx` and records every event through `click_service`.
///
/// At most `concurrency` writes are in flight. Transient write failures are
/// retried with jittered exponential backoff; other failures, and transient
/// ones that outlast the retries, are dropped with an error log.
///
/// Setting `shutdown` to `true` closes the channel even while senders are
/// still alive. Events already queued are still written. Returns once the
/// channel is closed and empty and all in-flight writes have finished.
pub async fn run_click_worker<C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    click_service: Arc<ClickService<C>>,
    concurrency: usize,
    mut shutdown: watch::Receiver<bool>,
) where
    C: ClickRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    loop {
        let event = tokio::select! {
            event = rx.recv() => event,
            Ok(()) = shutdown.changed() => {
                if *shutdown.borrow_and_update() {
                    debug!("Shutdown requested, draining click queue");
                    rx.close();
                }
                continue;
            }
        };
        let Some(event) = event else {
            break;
        };

        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let service = click_service.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            record_with_retry(&service, event.into()).await
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn record_with_retry<C: ClickRepository + ?Sized>(
    service: &ClickService<C>,
    new_click: NewClick,
) -> bool {
    let link_id = new_click.link_id;
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_WRITE_RETRIES);

    let result = RetryIf::start(
        strategy,
        || service.record_click(new_click.clone()),
        AppError::is_transient,
    )
    .await;

    match result {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(click_id = click.id, link_id, "Click recorded");
            true
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            error!(link_id, error = %e, transient = e.is_transient(), "Dropping click");
            false
        }
    }
}
