#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use orgdesk_api::auth::oidc::OidcConfig;
use orgdesk_api::config::{LogFormat, ServerConfig};
use orgdesk_api::router::build_app_router;
use orgdesk_api::state::AppState;
use orgdesk_core::employee::Employee;
use orgdesk_core::types::DbId;
use orgdesk_directory::memory::MemoryDirectory;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_ISSUER: &str = "https://idp.test";
pub const TEST_AUDIENCE: &str = "orgdesk";
pub const TEST_TENANT: &str = "acme";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        directory_base_url: "http://directory.invalid".to_string(),
        directory_timeout_secs: 15,
        subordinate_page_size: 100,
        log_format: LogFormat::Pretty,
        oidc: OidcConfig {
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            hs256_secret: TEST_SECRET.to_string(),
            role_claim: "roles".to_string(),
        },
    }
}

/// Application state backed by an in-memory directory.
pub fn build_test_state(directory: MemoryDirectory) -> AppState {
    AppState::new(test_config(), Arc::new(directory))
}

/// Build the full application router with all middleware layers, backed by
/// the given in-memory directory.
pub fn build_test_app(directory: MemoryDirectory) -> Router {
    build_app_router(build_test_state(directory))
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token(subject: &str, tenant: Option<&str>, roles: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "sub": subject,
        "roles": roles,
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "iat": now,
        "exp": now + 600,
        "jti": uuid::Uuid::new_v4().to_string(),
    });
    if let Some(tenant) = tenant {
        claims["tenant_id"] = json!(tenant);
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encoding should succeed")
}

pub fn admin_token() -> String {
    token("admin-1", Some(TEST_TENANT), &["admin"])
}

pub fn employee_token() -> String {
    token("employee-1", Some(TEST_TENANT), &["employee"])
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn employee(id: DbId, reports_to_id: Option<DbId>, name: &str) -> Employee {
    Employee {
        id,
        reports_to_id,
        assigned_branch_id: None,
        assigned_department_id: None,
        first_name: name.to_string(),
        last_name: String::new(),
        full_name: name.to_string(),
        job_title: None,
        is_draft: false,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}
