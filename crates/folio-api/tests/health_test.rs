//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test(start_paused = true)]
async fn test_health_reports_running_renderer() {
    let state = common::start_test_app().await;

    let (status, json) = common::get_json(common::build_test_app(&state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["renderer"], true);
    assert!(json["version"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_routes_outside_the_api_return_404() {
    let state = common::start_test_app().await;

    let (status, _) =
        common::get_json(common::build_test_app(&state), "/api/v1/projects").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
