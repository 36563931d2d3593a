//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router against an in-memory database with every
//! migration applied. Not every test file uses every helper.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use categorizer::config::{Config, JitterMode};
use categorizer::db::{create_in_memory_pool, migrations, DbPool};
use categorizer::server;
use categorizer::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tower::ServiceExt;

pub fn test_config(database_path: PathBuf) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path,
        migrations_path: PathBuf::from("migrations"),
        jitter: JitterMode::None,
        seed_demo: false,
    }
}

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// A client over a fresh in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }
        Self::with_state(AppState::new(pool, test_config(PathBuf::from(":memory:"))))
    }

    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn db(&self) -> &DbPool {
        &self.state.db
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };
        (status, value)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::json_request("POST", uri, &body)).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Self::json_request("PATCH", uri, &body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST a raw, possibly malformed, body.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    // =========================================================================
    // Helper methods for creating entities through the API
    // =========================================================================

    pub async fn create_user(&self, name: &str, email: &str) -> i64 {
        let (status, body) = self
            .post_json(
                "/api/users",
                json!({ "name": name, "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn create_transaction(&self, user_id: i64, description: &str, date: &str) -> i64 {
        let (status, body) = self
            .post_json(
                "/api/transactions",
                json!({
                    "user_id": user_id,
                    "description": description,
                    "amount": 12.5,
                    "transaction_date": date,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn create_prediction(&self, transaction_id: i64, category_id: i64) -> i64 {
        let (status, body) = self
            .post_json(
                "/api/predictions",
                json!({
                    "transaction_id": transaction_id,
                    "category_id": category_id,
                    "confidence": 0.9,
                    "influential_tokens": ["coffee"],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
