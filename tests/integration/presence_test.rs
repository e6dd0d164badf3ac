//! Integration tests for presence queries.

mod helpers;

use axum::http::StatusCode;
use learnhub_entity::user::UserRole;

use helpers::{T0, TestApp};

async fn beat(app: &TestApp, subject: &str, at_ms: i64) {
    app.clock.set(at_ms);
    let token = app.token(subject, UserRole::Student);
    let response = app.request("POST", "/api/heartbeat", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_active_users_requires_admin() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/presence/active", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let token = app.token("auth0|tomas", UserRole::Instructor);
    let response = app
        .request("GET", "/api/presence/active", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_active_users_sorted_with_counts() {
    let app = TestApp::new();
    let online = app.create_user("auth0|online", "Online", UserRole::Student);
    let away = app.create_user("auth0|away", "Away", UserRole::Student);
    let offline = app.create_user("auth0|offline", "Offline", UserRole::Student);

    beat(&app, "auth0|offline", T0).await;
    beat(&app, "auth0|away", T0 + 60_000).await;
    beat(&app, "auth0|online", T0 + 88_000).await;
    app.clock.set(T0 + 90_000);

    let admin = app.token("auth0|admin", UserRole::Admin);
    let response = app
        .request("GET", "/api/presence/active", Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body["total"], 3);
    assert_eq!(body["onlineCount"], 1);
    assert_eq!(body["awayCount"], 1);
    assert_eq!(body["offlineCount"], 1);
    assert_eq!(body["timestamp"], T0 + 90_000);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users[0]["userId"], online.to_string());
    assert_eq!(users[0]["status"], "online");
    assert_eq!(users[0]["lastSeenRelative"], "Just now");
    assert_eq!(users[1]["userId"], away.to_string());
    assert_eq!(users[1]["status"], "away");
    assert_eq!(users[1]["lastSeenRelative"], "30s ago");
    assert_eq!(users[2]["userId"], offline.to_string());
    assert_eq!(users[2]["status"], "offline");
}

#[tokio::test]
async fn test_active_users_status_filter() {
    let app = TestApp::new();
    app.create_user("auth0|a", "A", UserRole::Student);
    app.create_user("auth0|b", "B", UserRole::Student);
    beat(&app, "auth0|a", T0).await;
    beat(&app, "auth0|b", T0 + 20_000).await;

    let admin = app.token("auth0|admin", UserRole::Admin);
    let response = app
        .request("GET", "/api/presence/active?status=away", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["users"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["total"], 2);

    let response = app
        .request("GET", "/api/presence/active?status=busy", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_expired_records_drop_out() {
    let app = TestApp::new();
    app.create_user("auth0|a", "A", UserRole::Student);
    app.create_user("auth0|b", "B", UserRole::Student);

    beat(&app, "auth0|a", T0).await;
    beat(&app, "auth0|b", T0).await;
    beat(&app, "auth0|b", T0 + 250_000).await;
    app.clock.set(T0 + 300_000);

    let admin = app.token("auth0|admin", UserRole::Admin);
    let response = app
        .request("GET", "/api/presence/active", Some(&admin))
        .await;
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["users"][0]["name"], "B");
}

#[tokio::test]
async fn test_store_outage_reads_as_empty() {
    let app = TestApp::with_unreachable_store();
    let admin = app.token("auth0|admin", UserRole::Admin);

    let response = app
        .request("GET", "/api/presence/active", Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["users"], serde_json::json!([]));
    assert_eq!(response.body["total"], 0);
    assert_eq!(response.body["onlineCount"], 0);
    assert_eq!(response.body["awayCount"], 0);
    assert_eq!(response.body["offlineCount"], 0);
}

#[tokio::test]
async fn test_cohort_roster() {
    let app = TestApp::new();
    let priya = app.create_user("auth0|priya", "Priya Raman", UserRole::Student);
    let kenji = app.create_user("auth0|kenji", "Kenji Watanabe", UserRole::Student);
    let cohort = app.create_cohort("CS101 Fall", vec![kenji, priya]);

    beat(&app, "auth0|priya", T0).await;
    app.clock.set(T0 + 2_000);

    let token = app.token("auth0|kenji", UserRole::Student);
    let response = app
        .request("GET", &format!("/api/presence/cohort/{cohort}"), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body["cohortId"], cohort.to_string());
    assert_eq!(body["cohortName"], "CS101 Fall");
    assert_eq!(body["total"], 2);
    assert_eq!(body["onlineCount"], 1);
    assert_eq!(body["offlineCount"], 1);

    let members = body["members"].as_array().unwrap();
    assert_eq!(members[0]["userId"], priya.to_string());
    assert_eq!(members[0]["status"], "online");
    assert_eq!(members[1]["userId"], kenji.to_string());
    assert_eq!(members[1]["status"], "offline");
    assert_eq!(members[1]["lastSeenRelative"], "Unknown");
}

#[tokio::test]
async fn test_cohort_not_found_and_bad_id() {
    let app = TestApp::new();
    let token = app.token("auth0|kenji", UserRole::Student);

    let response = app
        .request(
            "GET",
            &format!("/api/presence/cohort/{}", uuid::Uuid::new_v4()),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/presence/cohort/not-a-uuid", Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
