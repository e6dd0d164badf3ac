//! Integration tests for heartbeat ingest.

mod helpers;

use axum::http::StatusCode;
use learnhub_database::ProfileStore;
use learnhub_entity::user::UserRole;

use helpers::{T0, TestApp};

#[tokio::test]
async fn test_heartbeat_returns_server_timestamp() {
    let app = TestApp::new();
    let id = app.create_user("auth0|priya", "Priya Raman", UserRole::Student);
    let token = app.token("auth0|priya", UserRole::Student);

    let response = app.request("POST", "/api/heartbeat", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["timestamp"], T0);

    app.settle().await;
    let profile = app.profiles.find_by_id(id).await.unwrap().unwrap();
    assert!(profile.is_online);
}

#[tokio::test]
async fn test_heartbeat_requires_token() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/heartbeat", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request("POST", "/api/heartbeat", Some("not-a-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_heartbeat_without_profile_is_not_found() {
    let app = TestApp::new();
    let token = app.token("auth0|ghost", UserRole::Student);

    let response = app.request("POST", "/api/heartbeat", Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_clear_twice_succeeds() {
    let app = TestApp::new();
    let id = app.create_user("auth0|priya", "Priya Raman", UserRole::Student);
    let token = app.token("auth0|priya", UserRole::Student);

    app.request("POST", "/api/heartbeat", Some(&token)).await;

    let first = app.request("DELETE", "/api/heartbeat", Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["success"], true);

    let second = app.request("DELETE", "/api/heartbeat", Some(&token)).await;
    assert_eq!(second.status, StatusCode::OK);

    app.settle().await;
    let profile = app.profiles.find_by_id(id).await.unwrap().unwrap();
    assert!(!profile.is_online);
}

#[tokio::test]
async fn test_heartbeat_with_store_down_is_presence_unavailable() {
    let app = TestApp::with_unreachable_store();
    app.create_user("auth0|priya", "Priya Raman", UserRole::Student);
    let token = app.token("auth0|priya", UserRole::Student);

    let response = app.request("POST", "/api/heartbeat", Some(&token)).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "PRESENCE_UNAVAILABLE");
}
