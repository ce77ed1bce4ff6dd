//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use folio_core::collaborator::PersistenceStore;
use folio_core::page::{ConfigSnapshot, FieldMap, PageRecord};
use folio_editor::application::sync_channel::SyncConfig;
use folio_renderer::template::MarkdownTemplate;
use folio_renderer::transition::TransitionTimings;
use folio_test_support::{FixedClock, InMemoryStore, fixed_now};
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_api::state::{AppState, Services};

/// The project every test starts from: a cover, a hidden map and a text
/// page.
pub fn seed() -> ConfigSnapshot {
    let mut map = PageRecord::new("map");
    map.hidden = true;
    ConfigSnapshot::new(
        "light",
        FieldMap::new(),
        vec![PageRecord::new("cover"), map, PageRecord::new("text")],
    )
}

/// Start the app on an in-memory store and wait until the renderer has
/// received its first snapshot.
pub async fn start_test_app() -> AppState {
    start_test_app_with_store(Arc::new(InMemoryStore::new())).await
}

/// Start the app on `store` and wait for the renderer handshake.
pub async fn start_test_app_with_store(store: Arc<dyn PersistenceStore>) -> AppState {
    let state = AppState::launch(
        Services {
            store,
            clock: Arc::new(FixedClock(fixed_now())),
            template: Arc::new(MarkdownTemplate::new()),
        },
        seed(),
        SyncConfig::default(),
        TransitionTimings::default(),
    )
    .await;
    state
        .renderer
        .wait_until(|s| s.page_count > 0)
        .await
        .unwrap();
    state
}

/// Build the full app router over `state`. Uses the same route structure
/// as `main.rs`.
pub fn build_test_app(state: &AppState) -> Router {
    folio_api::app(state.clone())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a bodyless request with `method` and return the response.
pub async fn send_empty(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_empty(app, "GET", uri).await
}
