//! Integration tests for the health probes.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_live_and_ready() {
    let app = TestApp::new();

    let live = app.request("GET", "/api/health/live", None, &[]).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["status"], "alive");
    assert!(live.body["timestamp"].is_string());

    let ready = app.request("GET", "/api/health/ready", None, &[]).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["status"], "ready");
}

#[tokio::test]
async fn test_health_reports_store_and_filesystem() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["services"]["store"]["backend"], "memory");
    assert_eq!(response.body["services"]["store"]["connected"], true);
    assert_eq!(response.body["services"]["filesystem"]["data_dir_writable"], true);
}

#[tokio::test]
async fn test_health_degrades_without_data_dir() {
    let app = TestApp::new();
    std::fs::remove_dir_all(app.data_dir.path()).unwrap();

    let health = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(health.status, StatusCode::SERVICE_UNAVAILABLE);

    let ready = app.request("GET", "/api/health/ready", None, &[]).await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready.body["status"], "not ready");
}

#[tokio::test]
async fn test_metrics_counts_imports() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.get_with_token("/api/reader/read?date=2001-01-01", &admin)
        .await;

    let response = app.request("GET", "/api/health/metrics", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["stats"]["errors"], 1);
    assert_eq!(response.body["application"]["environment"], "test");
}
