#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use campusdocs_api::auth::jwt::JwtConfig;
use campusdocs_api::config::{ServerConfig, UploadConfig};
use campusdocs_api::router::build_app_router;
use campusdocs_api::state::AppState;
use campusdocs_api::uploads::UploadStore;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const MULTIPART_BOUNDARY: &str = "campusdocs-test-boundary";

/// Build a test `ServerConfig` writing uploads to `upload_dir`.
pub fn test_config(upload_dir: &Path, max_upload_bytes: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        uploads: UploadConfig {
            dir: upload_dir.to_path_buf(),
            public_base_url: "http://localhost:3000".to_string(),
            max_bytes: max_upload_bytes,
        },
    }
}

/// Build the full application router over `pool`, with uploads going to a
/// throwaway directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let dir = std::env::temp_dir().join(format!("campusdocs-test-{}", uuid::Uuid::new_v4()));
    build_test_app_with_uploads(pool, &dir, campusdocs_core::upload::MAX_UPLOAD_BYTES)
}

/// Like [`build_test_app`] but with an explicit upload directory and limit,
/// for tests that inspect stored files.
pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: &Path, max_bytes: usize) -> Router {
    let config = test_config(upload_dir, max_bytes);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        uploads: Arc::new(UploadStore::new(&config.uploads)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), &body)).await
}

/// A multipart form with an optional `data` part and an optional `file` part.
pub fn multipart_body(data: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(data) = data {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: Vec<u8>,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a faculty account through the API and return `(token, id)`.
pub async fn signup(app: Router, email: &str) -> (String, i64) {
    let body = serde_json::json!({
        "email": email,
        "name": "Ada Lovelace",
        "password": "secret123",
        "department": "Computer Science",
    });
    let response = post_json(app, "/api/faculty", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["token"].as_str().unwrap().to_string(),
        json["faculty"]["id"].as_i64().unwrap(),
    )
}

/// Create a branch with the given year labels and return its JSON.
pub async fn create_branch(app: Router, name: &str, labels: &[&str]) -> Value {
    let years: Vec<Value> = labels
        .iter()
        .map(|l| serde_json::json!({ "label": l }))
        .collect();
    let body = serde_json::json!({ "branchName": name, "years": years });
    let response = post_json(app, "/api/upload/branches", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["branch"].clone()
}

/// Add a subject to a year and return the updated year JSON.
pub async fn add_subject(
    app: Router,
    token: &str,
    branch_id: i64,
    year_id: &str,
    name: &str,
) -> Value {
    let body = serde_json::json!({ "yearId": year_id, "subjectName": name });
    let response = post_json_auth(
        app,
        &format!("/api/upload/branches/{branch_id}/subjects"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["year"].clone()
}
