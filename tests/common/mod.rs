//! In-process test harness: a temp SQLite store behind the real router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use rollbook::auth::TokenGenerator;
use rollbook::server::{AppState, create_router};
use rollbook::store::{SqliteStore, Store};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}

pub struct TestApp {
    _temp_dir: TempDir,
    pub state: Arc<AppState>,
    pub admin_token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("rollbook.db")).expect("open store");
        store.initialize().expect("initialize store");

        let (admin_token, token) = TokenGenerator::new()
            .issue(None, true, None)
            .expect("issue admin token");
        store.create_token(&token).expect("store admin token");

        Self {
            _temp_dir: temp_dir,
            state: Arc::new(AppState::new(Arc::new(store))),
            admin_token,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn admin_post(&self, uri: &str, body: Value) -> TestResponse {
        self.post(&format!("/api/v1/admin{uri}"), &self.admin_token, body)
            .await
    }

    /// Creates an account through the admin API and returns (id, token).
    pub async fn create_account(&self, role: &str, name: &str) -> (String, String) {
        let resp = self
            .admin_post("/accounts", json!({ "display_name": name, "role": role }))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create account: {:?}", resp.body);
        let id = resp.data()["id"].as_str().expect("account id").to_string();

        let resp = self
            .admin_post(&format!("/accounts/{id}/tokens"), json!({}))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create token: {:?}", resp.body);
        let token = resp.data()["token"].as_str().expect("raw token").to_string();

        (id, token)
    }

    pub async fn assign(
        &self,
        staff_id: &str,
        course: &str,
        kind: &str,
        subject: Option<&str>,
    ) -> TestResponse {
        self.admin_post(
            &format!("/accounts/{staff_id}/assignments"),
            json!({ "course": course, "kind": kind, "subject": subject }),
        )
        .await
    }

    pub async fn enroll(&self, student_id: &str, course: &str) {
        let resp = self
            .admin_post(
                "/enrollments",
                json!({ "student_id": student_id, "course": course }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "enroll: {:?}", resp.body);
    }

    /// Records attendance as the admin token.
    pub async fn record_attendance(&self, student_id: &str, course: &str) {
        let resp = self
            .post(
                "/api/v1/attendance",
                &self.admin_token,
                json!({
                    "student_id": student_id,
                    "course": course,
                    "date": "2026-10-01",
                    "status": "present"
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "attendance: {:?}", resp.body);
    }
}

/// Collects one string field from every element of a JSON array.
pub fn field(values: &Value, name: &str) -> Vec<String> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v[name].as_str().expect("string field").to_string())
        .collect()
}
