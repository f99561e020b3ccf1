#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use reportcard_core::records::RecordService;
use reportcard_core::scoring::ScoringEngine;
use reportcard_db::memory::MemoryStudentStore;
use tower::ServiceExt;

use reportcard_api::config::ServerConfig;
use reportcard_api::router::build_app_router;
use reportcard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        db_max_connections: 1,
        log_json: false,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over a fresh in-memory store.
pub fn build_test_app() -> Router {
    let store = Arc::new(MemoryStudentStore::new());
    let state = AppState {
        records: Arc::new(RecordService::new(store, ScoringEngine::default())),
        pool: None,
    };
    build_app_router(state, &test_config())
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The three-exam sample record used across API tests.
pub fn sample_student(roll_number: i32) -> serde_json::Value {
    serde_json::json!({
        "rollNumber": roll_number,
        "name": "John Doe",
        "terms": [{
            "termName": "Term 1",
            "exams": [
                { "examName": "Exam 1", "subjectMarks": { "Physics": 78.0, "Chemistry": 72.0, "Biology": 80.0 } },
                { "examName": "Exam 2", "subjectMarks": { "Physics": 80.0, "Chemistry": 75.0, "Biology": 82.0 } },
                { "examName": "Exam 3", "subjectMarks": { "Physics": 85.0, "Chemistry": 78.0, "Biology": 84.0 } }
            ]
        }]
    })
}
