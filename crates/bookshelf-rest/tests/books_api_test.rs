//! HTTP scenarios against the full router with in-memory backends.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_repository::{
    memory::{InMemoryBookStore, InMemoryCache},
    CachedBookRepository, DEFAULT_TTL,
};
use bookshelf_rest::{create_router, AppState};
use bookshelf_service::{BookServiceImpl, HealthServiceImpl};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<InMemoryBookStore>,
    cache: Arc<InMemoryCache>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    fn with_timeout(request_timeout: Duration) -> Self {
        let store = Arc::new(InMemoryBookStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let repository = Arc::new(CachedBookRepository::new(
            store.clone(),
            cache.clone(),
            DEFAULT_TTL,
        ));
        let state = AppState::new(
            Arc::new(BookServiceImpl::new(repository)),
            Arc::new(HealthServiceImpl::new(store.clone(), cache.clone())),
            request_timeout,
        );

        Self {
            router: create_router(state),
            store,
            cache,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_raw(&self, body: &str) -> (StatusCode, Value) {
        let request = Request::post("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post(&self, book: Value) -> (StatusCode, Value) {
        self.post_raw(&book.to_string()).await
    }
}

#[tokio::test]
async fn test_create_get_and_list() {
    let app = TestApp::new();

    let (status, created) = app
        .post(json!({"id": "1", "title": "Clean Code", "rating": 4.8}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "1");
    assert_eq!(created["title"], "Clean Code");
    assert_eq!(created["rating"], 4.8);
    assert!(created["created_at"].is_string());

    let (status, found) = app.get("/books?id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    app.post(json!({"id": "2", "title": "Refactoring", "rating": 4.5}))
        .await;
    let (status, list) = app.get("/books").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "2");
    assert_eq!(list[1], created);
}

#[tokio::test]
async fn test_empty_title_rejected_without_side_effects() {
    let app = TestApp::new();

    let (status, body) = app
        .post(json!({"id": "2", "title": "", "rating": 3.0}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("title is required"));
    assert_eq!(app.store.insert_calls(), 0);
    assert_eq!(app.cache.set_calls(), 0);
    assert_eq!(app.cache.delete_calls(), 0);
}

#[tokio::test]
async fn test_out_of_range_rating_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post(json!({"id": "3", "title": "Refactoring", "rating": 5.5}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error: rating must be between 0 and 5");
    assert_eq!(
        body["details"],
        json!([{
            "field": "rating",
            "message": "rating must be between 0 and 5",
            "code": "rating_out_of_range"
        }])
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_missing_book_is_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/books?id=missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_empty_id_lists_books() {
    let app = TestApp::new();
    app.post(json!({"id": "1", "title": "Clean Code", "rating": 4.8}))
        .await;

    let (status, body) = app.get("/books?id=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_list_is_json_array() {
    let app = TestApp::new();

    let (status, body) = app.get("/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = TestApp::new();

    let (status, body) = app.post_raw(r#"{"id": "1", "title": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = app
        .post(json!({"id": "1", "title": "Clean Code", "rating": "high"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    assert_eq!(app.store.insert_calls(), 0);
}

#[tokio::test]
async fn test_duplicate_id_is_409() {
    let app = TestApp::new();
    let book = json!({"id": "1", "title": "Clean Code", "rating": 4.8});
    app.post(book.clone()).await;

    let (status, body) = app.post(book).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_other_methods_are_405() {
    let app = TestApp::new();

    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let request = Request::builder()
            .method(method)
            .uri("/books")
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn test_cache_outage_fails_readiness_but_serves_reads() {
    let app = TestApp::new();
    app.post(json!({"id": "1", "title": "Clean Code", "rating": 4.8}))
        .await;
    app.cache.set_failing(true);

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not ready");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .starts_with("cache check failed"));

    let (status, found) = app.get("/books?id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["title"], "Clean Code");
}

#[tokio::test]
async fn test_store_outage_short_circuits_readiness() {
    let app = TestApp::new();
    app.store.set_failing(true);

    let (status, body) = app.get("/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["details"]
        .as_str()
        .unwrap()
        .starts_with("database check failed"));
    assert_eq!(app.cache.ping_calls(), 0);
}

#[tokio::test]
async fn test_store_outage_on_read_is_500() {
    let app = TestApp::new();
    app.store.set_failing(true);

    let (status, body) = app.get("/books?id=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");
}

#[tokio::test]
async fn test_ready_when_dependencies_up() {
    let app = TestApp::new();

    let (status, body) = app.get("/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ready"}));
}

#[tokio::test]
async fn test_liveness_ignores_dependencies() {
    let app = TestApp::new();
    app.store.set_failing(true);
    app.cache.set_failing(true);

    for uri in ["/health", "/live"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy"}));
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_is_503() {
    let app = TestApp::with_timeout(Duration::from_millis(100));
    app.store.set_latency(Duration::from_secs(30));

    let (status, body) = app.get("/books").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "TIMEOUT");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = TestApp::new();

    let (status, body) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
}
