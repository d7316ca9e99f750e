//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use gatehouse_api::AppState;
use gatehouse_auth::password::PasswordHasher;
use gatehouse_auth::store::{CredentialStore, MemoryCredentialStore};
use gatehouse_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ReaderConfig, ServerConfig,
    StoreBackend,
};
use gatehouse_entity::user::NewUser;
use gatehouse_service::MemoryLineSink;

pub const ADMIN: &str = "alice";
pub const PASSWORD: &str = "Str0ng!Pass";
pub const ACCESS_SECRET: &str = "test-access-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store backing the router, for seeding users directly
    pub store: Arc<dyn CredentialStore>,
    /// Imported lines land here
    pub sink: Arc<MemoryLineSink>,
    /// Data directory read by the importer
    pub data_dir: TempDir,
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` of a `Set-Cookie` header, without attributes.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookie(name)
            .and_then(|raw| raw.split(';').next().map(str::to_string))
    }

    /// Full `Set-Cookie` header for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(str::to_string)
    }

    pub fn reason(&self) -> Option<&str> {
        self.body["reason"].as_str()
    }
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create data dir");
        let config = test_config(&data_dir);

        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let sink = Arc::new(MemoryLineSink::new());

        let state = AppState::new(config, Arc::clone(&store), sink.clone())
            .expect("Failed to build app state");

        Self {
            router: gatehouse_api::build_app(state),
            store,
            sink,
            data_dir,
        }
    }

    /// Send a request with an optional JSON body and extra headers
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a raw body with the given content type
    pub async fn request_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST /api/user/init with the given credentials
    pub async fn init(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/user/init",
            Some(serde_json::json!({ "username": username, "password": password })),
            &[],
        )
        .await
    }

    /// POST /api/user/token with the given credentials
    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/user/token",
            Some(serde_json::json!({ "username": username, "password": password })),
            &[],
        )
        .await
    }

    /// Bootstraps the admin and returns its access token
    pub async fn admin_token(&self) -> String {
        assert_eq!(self.init(ADMIN, PASSWORD).await.status, StatusCode::CREATED);
        access_token(&self.login(ADMIN, PASSWORD).await)
    }

    /// Inserts a user with the given role straight into the store
    pub async fn create_user(&self, username: &str, password: &str, role: &str) {
        let hash = PasswordHasher::new()
            .hash_password(password)
            .expect("Failed to hash password");
        self.store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: hash,
                role: role.to_string(),
            })
            .await
            .expect("Failed to create test user");
    }

    /// GET with `Authorization: JWT <token>`
    pub async fn get_with_token(&self, uri: &str, token: &str) -> TestResponse {
        let header = format!("JWT {token}");
        self.request("GET", uri, None, &[(AUTHORIZATION.as_str(), &header)])
            .await
    }

    /// GET with a `Cookie` header
    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request("GET", uri, None, &[(COOKIE.as_str(), cookie)])
            .await
    }
}

pub fn access_token(response: &TestResponse) -> String {
    response.body["data"]["access_token"]
        .as_str()
        .expect("missing access token")
        .to_string()
}

pub fn refresh_token(response: &TestResponse) -> String {
    response.body["data"]["refresh_token"]
        .as_str()
        .expect("missing refresh token")
        .to_string()
}

fn test_config(data_dir: &TempDir) -> AppConfig {
    AppConfig {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            backend: StoreBackend::Memory,
            ..DatabaseConfig::default()
        },
        auth: AuthConfig {
            access_token_secret: ACCESS_SECRET.to_string(),
            refresh_token_secret: "test-refresh-secret".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
            login_grant_ttl_seconds: 60,
            password_min_length: 8,
            password_min_score: 0,
            roles_file: None,
            secure_cookies: true,
        },
        reader: ReaderConfig {
            data_path: data_dir.path().display().to_string(),
        },
        logging: LoggingConfig::default(),
    }
}
