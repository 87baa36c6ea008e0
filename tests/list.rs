mod common;

use common::{ok, session, status, tokens_body, FakeBackend, Harness};
use serde_json::json;
use std::time::Duration;
use talabia::list::{LatestOnly, ListClient, ListQuery, PageRequest};
use talabia::ApiError;

#[tokio::test]
async fn test_fetch_sends_page_query_with_bearer() {
    let h = Harness::new(
        FakeBackend::new(|req| ok(json!({ "path": req.path }))),
        Some(session("A1", "R1")),
    );
    let lists = ListClient::new(h.client.clone(), Duration::from_secs(5));

    let query = ListQuery::new(PageRequest::from_offset(20, 10)).with_search("toyota");
    let page = lists.fetch("/Offers/list", &query).await.unwrap();

    assert_eq!(page["path"], "/Offers/list?pageNumber=3&pageSize=10&search=toyota");
    assert_eq!(h.backend.requests()[0].bearer(), Some("A1"));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let h = Harness::new(
        FakeBackend::new(|_| ok(json!([]))).with_delay(Duration::from_millis(500)),
        Some(session("A1", "R1")),
    );
    let lists = ListClient::new(h.client.clone(), Duration::from_millis(50));

    let err = lists
        .fetch("/Users/list", &ListQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Timeout);
    // A timed out list call is not an auth failure
    assert!(h.store.get_current().is_some());
}

#[tokio::test]
async fn test_new_load_cancels_previous() {
    let h = Harness::new(
        FakeBackend::new(|req| ok(json!({ "path": req.path }))).with_delay(Duration::from_millis(100)),
        Some(session("A1", "R1")),
    );
    let mut loader = LatestOnly::new(ListClient::new(h.client.clone(), Duration::from_secs(5)));

    let stale = loader.load("/Offers/list", ListQuery::default());
    let fresh = loader.load(
        "/Offers/list",
        ListQuery::new(PageRequest::from_offset(10, 10)),
    );

    let page = fresh.await.unwrap().unwrap();
    assert_eq!(page["path"], "/Offers/list?pageNumber=2&pageSize=10");
    assert!(stale.await.is_err());
}

#[tokio::test]
async fn test_dropping_loader_cancels_load() {
    let h = Harness::new(
        FakeBackend::new(|_| ok(json!([]))).with_delay(Duration::from_millis(100)),
        Some(session("A1", "R1")),
    );
    let mut loader = LatestOnly::new(ListClient::new(h.client.clone(), Duration::from_secs(5)));

    let pending = loader.load("/Brands/list", ListQuery::default());
    drop(loader);

    assert!(pending.await.is_err());
}

/// Business routes accept only A2; the refresh answers slowly.
fn slow_refresh_backend() -> FakeBackend {
    FakeBackend::new(|req| match req.route() {
        "/Auth/refresh-token" => ok(tokens_body("A2", "R2")),
        _ if req.bearer() == Some("A2") => ok(json!([])),
        _ => status(401),
    })
    .with_route_delay("/Auth/refresh-token", Duration::from_millis(100))
}

#[tokio::test]
async fn test_timeout_does_not_interrupt_refresh() {
    let h = Harness::new(slow_refresh_backend(), Some(session("A1", "R1")));
    let lists = ListClient::new(h.client.clone(), Duration::from_millis(30));

    let err = lists
        .fetch("/Offers/list", &ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let current = h.store.get_current().unwrap();
    assert_eq!(current.access_token, "A2");
    assert_eq!(current.refresh_token, "R2");
    assert_eq!(h.backend.requests_to("/Auth/refresh-token").len(), 1);
    assert_eq!(h.navigator.redirects(), 0);
}

#[tokio::test]
async fn test_superseded_load_does_not_interrupt_refresh() {
    let h = Harness::new(slow_refresh_backend(), Some(session("A1", "R1")));
    let mut loader = LatestOnly::new(ListClient::new(h.client.clone(), Duration::from_secs(5)));

    let stale = loader.load("/Offers/list", ListQuery::default());
    tokio::time::sleep(Duration::from_millis(30)).await;
    loader.cancel();
    assert!(stale.await.is_err());

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(h.store.get_current().unwrap().access_token, "A2");
    assert_eq!(h.backend.requests_to("/Auth/refresh-token").len(), 1);
}

#[tokio::test]
async fn test_timeout_does_not_interrupt_logout_fallback() {
    let backend = FakeBackend::new(|req| match req.route() {
        "/Auth/logout" => ok(json!({})),
        _ => status(401),
    })
    .with_route_delay("/Auth/refresh-token", Duration::from_millis(100));
    let h = Harness::new(backend, Some(session("A1", "R1")));
    let lists = ListClient::new(h.client.clone(), Duration::from_millis(30));

    let err = lists
        .fetch("/Offers/list", &ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(h.store.get_current().is_none());
    assert_eq!(h.backend.requests_to("/Auth/logout").len(), 1);
    assert_eq!(h.navigator.redirects(), 1);
}
