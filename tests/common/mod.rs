#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use trivia_api::db::{
    establish_connection,
    queries::{categories::create_category, questions::create_question},
    run_migrations,
};

/// A migrated database in its own temporary directory; dropped with the test.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("trivia.db").display());
    let pool = establish_connection(&url)
        .await
        .expect("failed to create test database");
    run_migrations(&pool).await.expect("migrations failed");
    TestDb { pool, _dir: dir }
}

/// Three categories and `n` questions spread over categories 1 and 2.
pub async fn seed(pool: &SqlitePool, n: usize) -> Vec<i64> {
    for kind in ["Science", "Art", "Geography"] {
        create_category(pool, kind).await.unwrap();
    }
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let category = (i % 2) as i64 + 1;
        let id = create_question(
            pool,
            &format!("Question number {i}?"),
            &format!("Answer {i}"),
            category,
            (i % 5) as i64 + 1,
        )
        .await
        .unwrap();
        ids.push(id);
    }
    ids
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, json)
}

pub fn assert_error(status: StatusCode, body: &Value, code: u16, message: &str) {
    assert_eq!(status.as_u16(), code, "unexpected status, body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
    assert_eq!(body["message"], message);
}
