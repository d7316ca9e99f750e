//! Integration tests for the gated data file importer.

use axum::http::StatusCode;
use chrono::Local;

use crate::helpers::{PASSWORD, TestApp, access_token};

#[tokio::test]
async fn test_reader_requires_permission() {
    let app = TestApp::new();
    app.admin_token().await;
    app.create_user("bob", PASSWORD, "user").await;
    let bob = access_token(&app.login("bob", PASSWORD).await);

    let response = app.get_with_token("/api/reader/read", &bob).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.reason(), Some("INSUFFICIENT_PRIVILEGES"));

    let anonymous = app.request("GET", "/api/reader/read", None, &[]).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reader_missing_file() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let response = app
        .get_with_token("/api/reader/read?date=2001-01-01", &admin)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "This file does not exist!");
}

#[tokio::test]
async fn test_reader_imports_dated_file() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    std::fs::write(app.data_dir.path().join("2024-03-09.txt"), "alpha\nbeta\n").unwrap();

    let response = app
        .get_with_token("/api/reader/read?date=2024-03-09", &admin)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["lines_imported"], 2);
    assert_eq!(app.sink.lines().await, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_reader_defaults_to_today() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    std::fs::write(app.data_dir.path().join(format!("{today}.txt")), "only\n").unwrap();

    let response = app.get_with_token("/api/reader/read", &admin).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["date"], today);
    assert_eq!(response.body["data"]["lines_imported"], 1);
}

#[tokio::test]
async fn test_reader_rejects_bad_date() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let response = app
        .get_with_token("/api/reader/read?date=yesterday", &admin)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
