mod common;

use tokio::sync::{mpsc, watch};
use url_shortener_core::domain::click_event::ClickEvent;
use url_shortener_core::domain::click_worker::run_click_worker;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queued_clicks_are_all_recorded() {
    let services = common::memory_services();

    let link = services
        .link_service
        .create_link("https://example.com")
        .await
        .unwrap();

    let (tx, rx) = mpsc::channel(64);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_click_worker(
        rx,
        services.click_service.clone(),
        5,
        shutdown_rx,
    ));

    for i in 0..50 {
        tx.send(ClickEvent::new(
            link.id,
            Some(format!("10.0.0.{i}")),
            Some("Mozilla/5.0"),
            None,
        ))
        .await
        .unwrap();
    }
    drop(tx);
    worker.await.unwrap();

    let count = services
        .click_service
        .get_clicks_count_by_link_id(link.id)
        .await
        .unwrap();
    assert_eq!(count, 50);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_link_clicks_are_dropped() {
    let services = common::memory_services();

    let link = services
        .link_service
        .create_link("https://example.com")
        .await
        .unwrap();

    let (tx, rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(run_click_worker(
        rx,
        services.click_service.clone(),
        2,
        shutdown_rx,
    ));

    tx.send(ClickEvent::new(link.id, None, None, None)).await.unwrap();
    tx.send(ClickEvent::new(link.id + 100, None, None, None))
        .await
        .unwrap();
    drop(tx);
    worker.await.unwrap();

    assert_eq!(services.store.click_count(), 1);
}
