//! Integration tests for the health endpoint.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health_reports_store_connected() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["presenceStore"], "connected");
    assert_eq!(response.body["data"]["database"], "memory");
    assert_eq!(
        response.body["data"]["version"],
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::test]
async fn test_health_reports_degraded_store() {
    let app = TestApp::with_unreachable_store();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "degraded");
    assert_eq!(response.body["data"]["presenceStore"], "unavailable");
}
