//! Integration tests for bootstrap, login, refresh and the access gate.

use axum::http::StatusCode;
use axum::http::header::{COOKIE, USER_AGENT};
use serde_json::json;

use gatehouse_auth::jwt::AccessClaims;

use crate::helpers::{ACCESS_SECRET, ADMIN, PASSWORD, TestApp, access_token, refresh_token};

#[tokio::test]
async fn test_init_creates_admin_once() {
    let app = TestApp::new();

    let first = app.init(ADMIN, PASSWORD).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["success"], true);
    assert_eq!(first.body["data"]["username"], ADMIN);
    assert_eq!(first.body["data"]["role"], "admin");
    assert!(first.body["data"].get("password_hash").is_none());

    let second = app.init("mallory", PASSWORD).await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);
    assert_eq!(second.body["error"], "FORBIDDEN");
    assert_eq!(second.reason(), Some("ALREADY_INITIALIZED"));
}

#[tokio::test]
async fn test_init_rejects_bad_input() {
    let app = TestApp::new();

    let missing = app
        .request("POST", "/api/user/init", Some(json!({ "username": ADMIN })), &[])
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Missing some required parameters");

    let mistyped = app
        .request(
            "POST",
            "/api/user/init",
            Some(json!({ "username": 42, "password": PASSWORD })),
            &[],
        )
        .await;
    assert_eq!(mistyped.status, StatusCode::BAD_REQUEST);
    assert_eq!(mistyped.body["message"], "Parameters must be of type String");

    let weak = app.init(ADMIN, "short").await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.body["error"], "BAD_PARAMETERS");

    // None of the rejected attempts consumed the bootstrap.
    assert_eq!(app.init(ADMIN, PASSWORD).await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_sets_cookies_and_returns_pair() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;

    let response = app.login(ADMIN, PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["session_id"].is_string());

    let access = response.set_cookie("token").expect("token cookie");
    assert!(access.contains(&format!("token=JWT {}", access_token(&response))));
    assert!(access.contains("Path=/"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Secure"));
    assert!(access.contains("SameSite=Strict"));

    let refresh = response.set_cookie("refreshToken").expect("refresh cookie");
    assert!(refresh.contains("Path=/api/user/refreshtoken"));
    assert!(refresh.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;

    let wrong_password = app.login(ADMIN, "not-the-password").await;
    let unknown_user = app.login("nobody", PASSWORD).await;

    for response in [&wrong_password, &unknown_user] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.reason(), Some("AUTHENTICATION_FAILED"));
        assert!(response.set_cookie("token").is_none());
    }
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_verify_accepts_header_and_cookie() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;
    let login = app.login(ADMIN, PASSWORD).await;
    let token = access_token(&login);

    let via_header = app.get_with_token("/api/user/verify", &token).await;
    assert_eq!(via_header.status, StatusCode::OK);
    assert_eq!(via_header.body["data"]["username"], ADMIN);
    assert_eq!(via_header.body["data"]["role"], "admin");
    assert!(via_header.body["data"]["userId"].is_string());

    let cookie = login.cookie("token").expect("token cookie");
    let via_cookie = app.get_with_cookie("/api/user/verify", &cookie).await;
    assert_eq!(via_cookie.status, StatusCode::OK);
    assert_eq!(via_cookie.body["data"], via_header.body["data"]);
}

#[tokio::test]
async fn test_verify_rejections_carry_reason() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;
    let token = access_token(&app.login(ADMIN, PASSWORD).await);

    let none = app.request("GET", "/api/user/verify", None, &[]).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);
    assert_eq!(none.reason(), Some("NO_TOKEN"));

    let bearer = format!("Bearer {token}");
    let wrong_scheme = app
        .request("GET", "/api/user/verify", None, &[("authorization", &bearer)])
        .await;
    assert_eq!(wrong_scheme.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_scheme.reason(), Some("BAD_TOKEN_FORMAT"));

    let garbage = app.get_with_token("/api/user/verify", "not.a.jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.reason(), Some("INVALID"));
}

#[tokio::test]
async fn test_expired_access_token_is_reported() {
    let app = TestApp::new();
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        user_id: uuid::Uuid::new_v4(),
        username: ADMIN.to_string(),
        role: "admin".to_string(),
        iat: now - 3_600,
        exp: now - 60,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app.get_with_token("/api/user/verify", &token).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("EXPIRED"));
}

#[tokio::test]
async fn test_malformed_refresh_body_uses_error_envelope() {
    let app = TestApp::new();

    let response = app
        .request_raw(
            "POST",
            "/api/user/refreshtoken",
            "application/json",
            "{not json",
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "BAD_PARAMETERS");
    assert_eq!(response.body["message"], "Malformed JSON body");
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access_token() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;
    let refresh = refresh_token(&app.login(ADMIN, PASSWORD).await);

    let response = app.get_with_token("/api/user/verify", &refresh).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.reason(), Some("INVALID"));
}

#[tokio::test]
async fn test_refresh_rotates_and_detects_replay() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;
    let login = app.login(ADMIN, PASSWORD).await;
    let original = refresh_token(&login);

    let rotated = app
        .request(
            "POST",
            "/api/user/refreshtoken",
            Some(json!({ "refreshToken": original })),
            &[],
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let next = refresh_token(&rotated);
    assert_ne!(next, original);
    assert_eq!(rotated.body["data"]["session_id"], login.body["data"]["session_id"]);
    assert!(rotated.set_cookie("refreshToken").is_some());

    let new_access = access_token(&rotated);
    let verify = app.get_with_token("/api/user/verify", &new_access).await;
    assert_eq!(verify.status, StatusCode::OK);

    let replay = app
        .request(
            "POST",
            "/api/user/refreshtoken",
            Some(json!({ "refreshToken": original })),
            &[],
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.reason(), Some("SESSION_NOT_FOUND"));
}

#[tokio::test]
async fn test_refresh_from_cookie() {
    let app = TestApp::new();
    app.init(ADMIN, PASSWORD).await;
    let login = app.login(ADMIN, PASSWORD).await;
    let cookie = login.cookie("refreshToken").expect("refresh cookie");

    let response = app
        .request(
            "POST",
            "/api/user/refreshtoken",
            None,
            &[(COOKIE.as_str(), &cookie), (USER_AGENT.as_str(), "integration")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_ne!(refresh_token(&response), refresh_token(&login));
}

#[tokio::test]
async fn test_refresh_without_token_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/user/refreshtoken", Some(json!({})), &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_permissions_for_admin_and_user() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let response = app.get_with_token("/api/user/permissions", &admin).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["role"], "admin");
    assert_eq!(response.body["data"]["permissions"], "*");

    app.create_user("bob", PASSWORD, "user").await;
    let bob = access_token(&app.login("bob", PASSWORD).await);
    let response = app.get_with_token("/api/user/permissions", &bob).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["role"], "user");
    assert_eq!(response.body["data"]["permissions"], json!([]));
}
