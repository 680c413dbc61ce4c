//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt; // for `.oneshot()`

use memo_api::services::{MemoService, SummaryCache};
use memo_api::{build_router, AppState};
use memo_core::{EventBus, Memo, MemoRepository};
use memo_db::test_fixtures::create_request;
use memo_db::InMemoryMemoRepository;
use memo_inference::{MockGenerationBackend, Summarizer};

pub struct TestApp {
    pub router: Router,
    pub service: MemoService,
    pub repo: Arc<InMemoryMemoRepository>,
    pub backend: MockGenerationBackend,
}

pub fn setup(backend: MockGenerationBackend) -> TestApp {
    let repo = Arc::new(InMemoryMemoRepository::new());
    let service = MemoService::new(
        repo.clone(),
        Summarizer::new(Arc::new(backend.clone())),
        SummaryCache::memory(64),
        Arc::new(EventBus::default()),
    );
    let router = build_router(
        AppState::new(service.clone()),
        &["http://localhost:3000".to_string()],
    );
    TestApp {
        router,
        service,
        repo,
        backend,
    }
}

impl TestApp {
    /// Insert straight into the store and reload, so no enrichment runs.
    pub async fn seed(&self, title: &str, content: &str, tags: &[&str]) -> Memo {
        let mut req = create_request(title, Utc::now());
        req.content = content.to_string();
        req.tags = tags.iter().map(|t| t.to_string()).collect();
        let memo = self.repo.insert(req).await.unwrap();
        self.service.load().await.unwrap();
        memo
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(val) => builder.body(Body::from(val.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Poll the enrichment endpoint until it leaves `pending`.
    pub async fn wait_for_enrichment(&self, id: &str) -> Value {
        for _ in 0..100 {
            let (status, body) = self
                .send(Method::GET, &format!("/memos/{}/enrichment", id), None)
                .await;
            if status == StatusCode::OK && body["status"] != "pending" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("enrichment for {} did not finish", id);
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
}
