#![allow(dead_code)]

use axum::http::StatusCode;
use ccs_api::api::{self, AppState};
use ccs_api::config::{DatabaseConfig, DatabaseTarget};
use ccs_api::db::{Gateway, SqlParam};
use ccs_api::Repository;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

const SCHEMA: &str = include_str!("../fixtures/ccs_schema.sql");

pub struct TestApp {
    pub app: axum::Router,
    pub repo: Arc<Repository>,
    pub _temp: TempDir,
}

fn sqlite_config(url: String) -> DatabaseConfig {
    DatabaseConfig {
        target: DatabaseTarget::Url(url),
        connection_limit: 5,
        acquire_timeout: Duration::from_secs(2),
    }
}

fn build(gateway: Gateway, temp_dir: TempDir) -> TestApp {
    let repo = Arc::new(Repository::new(gateway));
    let app = api::create_router(AppState::new(repo.clone()));
    TestApp {
        app,
        repo,
        _temp: temp_dir,
    }
}

/// App backed by a fresh SQLite file carrying the reference schema.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let gateway = Gateway::connect_lazy(&sqlite_config(format!("sqlite:{}?mode=rwc", db_path)))
        .expect("connect_lazy failed");

    for statement in SCHEMA.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            gateway.execute(trimmed, &[]).await.expect("schema failed");
        }
    }

    build(gateway, temp_dir)
}

/// App whose store cannot be opened, so every connection attempt fails.
pub fn setup_unreachable_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("missing")
        .join("ccs.db")
        .to_string_lossy()
        .to_string();
    let gateway = Gateway::connect_lazy(&sqlite_config(format!("sqlite:{}?mode=ro", db_path)))
        .expect("connect_lazy failed");
    build(gateway, temp_dir)
}

pub async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, Vec<u8>) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: axum::Router, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body))
        .unwrap();
    send(app, req).await
}

/// POST with a body but no `Content-Type` header.
pub async fn post_untyped(app: axum::Router, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .body(axum::body::Body::from(body))
        .unwrap();
    send(app, req).await
}

async fn send(app: axum::Router, req: axum::http::Request<axum::body::Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, body)
}

pub fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

pub async fn exec(repo: &Repository, sql: &str, params: &[SqlParam]) {
    repo.gateway().execute(sql, params).await.unwrap();
}

pub async fn seed_account(repo: &Repository, id: i64, email: &str, password: &str) {
    exec(
        repo,
        "INSERT INTO ccs_account (account_id, account_email, account_password, account_name) VALUES (?, ?, ?, ?)",
        &[
            SqlParam::Int(id),
            SqlParam::Text(email.to_string()),
            SqlParam::Text(password.to_string()),
            SqlParam::Text(format!("account {}", id)),
        ],
    )
    .await;
}

pub async fn expert_count(repo: &Repository) -> usize {
    repo.gateway()
        .fetch_all("SELECT * FROM ccs_expert", &[])
        .await
        .unwrap()
        .len()
}
