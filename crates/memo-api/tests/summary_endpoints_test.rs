//! Router tests for the summary generation endpoints.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use memo_core::defaults::{
    CONTENT_EMPTY_MESSAGE, CONTENT_REQUIRED_MESSAGE, SUMMARY_ERROR_MESSAGE,
    SUMMARY_TAGS_ERROR_MESSAGE,
};
use memo_core::MemoRepository;
use memo_inference::MockGenerationBackend;

use common::{body_json, setup};

#[tokio::test]
async fn test_blank_content_is_rejected_before_generation() {
    let app = setup(MockGenerationBackend::new());

    let (status, body) = app
        .send(Method::POST, "/memos/summary", Some(json!({"content": "   "})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], CONTENT_EMPTY_MESSAGE);
    assert_eq!(app.backend.call_count(), 0);
}

#[tokio::test]
async fn test_missing_or_non_text_content_is_rejected() {
    let app = setup(MockGenerationBackend::new());

    for payload in [json!({}), json!({"content": 7}), json!({"content": ""})] {
        let (status, body) = app
            .send(Method::POST, "/memos/summary", Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], CONTENT_REQUIRED_MESSAGE);
    }
    assert_eq!(app.backend.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup(MockGenerationBackend::new());

    let response = app
        .raw(
            Request::builder()
                .method(Method::POST)
                .uri("/memos/summary")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_stateless_summary() {
    let app = setup(MockGenerationBackend::new().with_response("A short summary"));

    let (status, body) = app
        .send(
            Method::POST,
            "/memos/summary",
            Some(json!({"content": "long text"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "A short summary"}));
    assert!(app.repo.is_empty());
}

#[tokio::test]
async fn test_memo_summary_with_tags_is_persisted() {
    let app = setup(MockGenerationBackend::new().with_response(r#"{"summary":"S","tags":["x","y"]}"#));
    let memo = app.seed("note", "valid text", &[]).await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/memos/{}/summary", memo.id),
            Some(json!({"content": "valid text", "generateTags": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "S", "tags": ["x", "y"]}));

    let stored = app.repo.fetch(memo.id).await.unwrap().unwrap();
    assert_eq!(stored.summary.as_deref(), Some("S"));
    assert_eq!(stored.tags, vec!["x".to_string(), "y".to_string()]);
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn test_persist_failure_still_returns_generated_payload() {
    let app = setup(MockGenerationBackend::new().with_response(r#"{"summary":"S","tags":["x","y"]}"#));
    let memo = app.seed("note", "valid text", &["keep"]).await;
    app.repo.set_fail_updates(true);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/memos/{}/summary", memo.id),
            Some(json!({"content": "valid text", "generateTags": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "S", "tags": ["x", "y"]}));

    let stored = app.repo.fetch(memo.id).await.unwrap().unwrap();
    assert_eq!(stored, memo);
}

#[tokio::test]
async fn test_summary_only_keeps_existing_tags() {
    let app = setup(MockGenerationBackend::new().with_response("Only a summary"));
    let memo = app.seed("note", "valid text", &["mine"]).await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/memos/{}/summary", memo.id),
            Some(json!({"content": "valid text"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "Only a summary"}));

    let stored = app.repo.fetch(memo.id).await.unwrap().unwrap();
    assert_eq!(stored.summary.as_deref(), Some("Only a summary"));
    assert_eq!(stored.tags, vec!["mine".to_string()]);

    let calls = app.backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].options.response_mime_type.is_none());
}

#[tokio::test]
async fn test_unknown_memo_still_returns_generated_summary() {
    let app = setup(MockGenerationBackend::new().with_response("Summary"));

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/memos/{}/summary", uuid::Uuid::new_v4()),
            Some(json!({"content": "text"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Summary");
}

#[tokio::test]
async fn test_generation_failure_is_500_with_generic_message() {
    let app = setup(MockGenerationBackend::new().with_failure("upstream exploded"));
    let memo = app.seed("note", "text", &[]).await;

    let (status, body) = app
        .send(Method::POST, "/memos/summary", Some(json!({"content": "text"})))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], SUMMARY_ERROR_MESSAGE);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/memos/{}/summary", memo.id),
            Some(json!({"content": "text", "generateTags": true})),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], SUMMARY_TAGS_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_get_summary_reads_cache_after_generation() {
    let app = setup(MockGenerationBackend::new().with_response("Cached summary"));
    let memo = app.seed("note", "text", &[]).await;
    let uri = format!("/memos/{}/summary", memo.id);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.send(Method::POST, &uri, Some(json!({"content": "text"})))
        .await;
    assert_eq!(
        app.service.cache().get(memo.id).await.as_deref(),
        Some("Cached summary")
    );

    let (status, body) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Cached summary");
}

#[tokio::test]
async fn test_non_uuid_memo_id_still_returns_generated_summary() {
    let app = setup(
        MockGenerationBackend::new().with_response(r#"{"summary":"S","tags":["x","y"]}"#),
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/memos/abc-123/summary",
            Some(json!({"content": "valid text", "generateTags": true})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "S", "tags": ["x", "y"]}));
    assert_eq!(app.backend.call_count(), 1);
    assert!(app.repo.is_empty());
}

#[tokio::test]
async fn test_blank_content_with_non_uuid_id_reports_empty_content() {
    let app = setup(MockGenerationBackend::new());

    let (status, body) = app
        .send(
            Method::POST,
            "/memos/abc-123/summary",
            Some(json!({"content": "  "})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], CONTENT_EMPTY_MESSAGE);
    assert_eq!(app.backend.call_count(), 0);
}
