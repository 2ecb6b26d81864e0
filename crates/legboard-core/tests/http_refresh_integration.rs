//! Integration tests for the HTTP provider and refresh controller together:
//! the full poll -> classify -> display-state path against a mock endpoint.

use chrono::Utc;
use legboard_core::error::ProviderError;
use legboard_core::provider::{HttpProvider, SnapshotProvider};
use legboard_core::refresh::RefreshController;
use legboard_core::snapshot::Snapshot;
use mockito::{Matcher, Server};

fn goal_body(completed: u32) -> String {
    let snapshot = Snapshot {
        recently_completed_legs: completed,
        ..Snapshot::sample()
    };
    serde_json::to_string(&snapshot).unwrap()
}

async fn fetch_err(base: &str, path: &str) -> ProviderError {
    let mut provider = HttpProvider::new(&format!("{base}{path}"), "UTC").unwrap();
    provider.fetch().await.unwrap_err()
}

async fn poll(
    base: &str,
    path: &str,
    controller: &mut RefreshController,
) -> Vec<legboard_core::Event> {
    let mut provider = HttpProvider::new(&format!("{base}{path}"), "UTC").unwrap();
    controller.begin();
    controller.complete(provider.fetch().await, Utc::now())
}

#[tokio::test]
async fn fetch_sends_timezone_and_cache_busting_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/goal")
        .match_query(Matcher::UrlEncoded("tz".into(), "America/New_York".into()))
        .match_header("cache-control", "no-cache")
        .match_header("pragma", "no-cache")
        .with_header("content-type", "application/json")
        .with_body(goal_body(8))
        .create_async()
        .await;

    let mut provider =
        HttpProvider::new(&format!("{}/goal", server.url()), "America/New_York").unwrap();
    let snapshot = provider.fetch().await.unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot.recently_completed_legs, 8);
    assert_eq!(snapshot.ytd_legs, 3115);
}

#[tokio::test]
async fn fetch_attaches_basic_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/goal")
        .match_query(Matcher::Any)
        .match_header("authorization", Matcher::Regex("^Basic ".into()))
        .with_header("content-type", "application/json")
        .with_body(goal_body(3))
        .create_async()
        .await;

    let mut provider = HttpProvider::new(&format!("{}/goal", server.url()), "UTC")
        .unwrap()
        .with_credentials("ops", "secret");
    provider.fetch().await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_and_server_errors_are_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/reject")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("www-authenticate", "Basic realm=\"Secure Area\"")
        .create_async()
        .await;
    server
        .mock("GET", "/down")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", "/garbled")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body("{\"upcoming\": \"not-a-list\"}")
        .create_async()
        .await;

    let base = server.url();
    assert!(matches!(
        fetch_err(&base, "/reject").await,
        ProviderError::Unauthorized
    ));
    assert!(matches!(
        fetch_err(&base, "/down").await,
        ProviderError::Status { status: 503 }
    ));
    assert!(matches!(
        fetch_err(&base, "/garbled").await,
        ProviderError::Malformed(_)
    ));
}

#[tokio::test]
async fn failed_poll_keeps_previous_snapshot_on_display() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/poll-1")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(goal_body(5))
        .create_async()
        .await;
    server
        .mock("GET", "/poll-2")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/poll-3")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(goal_body(7))
        .create_async()
        .await;

    let mut controller = RefreshController::new();
    let base = server.url();

    // Poll 1: healthy.
    poll(&base, "/poll-1", &mut controller).await;
    assert!(controller.state().error.is_none());
    let displayed_after_poll_1 = controller.snapshot().clone();

    // Poll 2: upstream falls over; the display keeps the stale snapshot.
    poll(&base, "/poll-2", &mut controller).await;
    assert_eq!(controller.snapshot(), &displayed_after_poll_1);
    assert!(controller.state().error.is_some());

    // Poll 3: recovered; the error clears and the snapshot moves again.
    let events = poll(&base, "/poll-3", &mut controller).await;
    assert!(controller.state().error.is_none());
    assert_eq!(controller.snapshot().recently_completed_legs, 7);
    // 5 -> 7 across the outage still counts as an increase.
    assert!(events
        .iter()
        .any(|e| matches!(e, legboard_core::Event::LegsCompleted { from: 5, to: 7, .. })));
}
