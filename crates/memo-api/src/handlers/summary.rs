//! Summary generation handlers.
//!
//! Both POST endpoints read the body as raw JSON so that a missing,
//! non-text or blank `content` can be told apart and answered with the
//! matching message.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use memo_core::defaults::{CONTENT_EMPTY_MESSAGE, CONTENT_REQUIRED_MESSAGE};

use crate::services::GeneratedSummary;
use crate::{ApiError, AppState};

/// Body accepted by the summary endpoints.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Memo text to summarize. Must not be blank.
    pub content: String,
    /// Also generate tags (memo-scoped endpoint only).
    #[serde(default)]
    pub generate_tags: Option<bool>,
}

/// Extract a usable `content` string or reject the request.
fn require_content(body: &Value) -> Result<&str, ApiError> {
    match body.get("content") {
        Some(Value::String(content)) if !content.is_empty() => {
            if content.trim().is_empty() {
                Err(ApiError::BadRequest(CONTENT_EMPTY_MESSAGE.to_string()))
            } else {
                Ok(content)
            }
        }
        _ => Err(ApiError::BadRequest(CONTENT_REQUIRED_MESSAGE.to_string())),
    }
}

/// Loose boolean: `null`, `false`, `0` and `""` are off, anything else present is on.
fn flag_enabled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Generate a summary (and optionally tags) for a memo and store it.
///
/// A failure to store the result is logged; the generated content is
/// returned either way. That includes an id naming no memo.
#[utoipa::path(
    post,
    path = "/memos/{id}/summary",
    tag = "summary",
    params(("id" = String, Path, description = "Memo id")),
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Generated summary, plus tags when requested", body = GeneratedSummary),
        (status = 400, description = "Missing or empty content"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn summarize_memo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GeneratedSummary>, ApiError> {
    let Json(body) = payload?;
    let content = require_content(&body)?;
    let generate_tags = flag_enabled(body.get("generateTags"));
    let Path(id) = id?;

    debug!(subsystem = "api", memo_id = %id, generate_tags, "Summary requested");
    let generated = state
        .service
        .generate_for_memo(&id, content, generate_tags)
        .await?;
    Ok(Json(generated))
}

/// Summarize arbitrary content without storing anything.
#[utoipa::path(
    post,
    path = "/memos/summary",
    tag = "summary",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Generated summary", body = GeneratedSummary),
        (status = 400, description = "Missing or empty content"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn summarize_content(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GeneratedSummary>, ApiError> {
    let Json(body) = payload?;
    let content = require_content(&body)?;

    let summary = state.service.summarize(content).await?;
    Ok(Json(GeneratedSummary {
        summary,
        tags: None,
    }))
}

/// Stored summary for a memo, served from the summary cache when present.
#[utoipa::path(
    get,
    path = "/memos/{id}/summary",
    tag = "summary",
    params(("id" = Uuid, Path, description = "Memo id")),
    responses(
        (status = 200, description = "Stored summary", body = GeneratedSummary),
        (status = 404, description = "No summary for this memo")
    )
)]
pub async fn get_memo_summary(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GeneratedSummary>, ApiError> {
    let Path(id) = id?;
    match state.service.cached_summary(id).await? {
        Some(summary) => Ok(Json(GeneratedSummary {
            summary,
            tags: None,
        })),
        None => Err(ApiError::NotFound(format!("No summary for memo {}", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_content() {
        assert_eq!(require_content(&json!({"content": "text"})).unwrap(), "text");
        assert_eq!(
            require_content(&json!({"content": "  padded  "})).unwrap(),
            "  padded  "
        );

        let message = |body: Value| match require_content(&body) {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        };
        assert_eq!(message(json!({"content": "   "})), CONTENT_EMPTY_MESSAGE);
        assert_eq!(message(json!({"content": ""})), CONTENT_REQUIRED_MESSAGE);
        assert_eq!(message(json!({"content": 42})), CONTENT_REQUIRED_MESSAGE);
        assert_eq!(message(json!({})), CONTENT_REQUIRED_MESSAGE);
        assert_eq!(message(json!(["content"])), CONTENT_REQUIRED_MESSAGE);
    }

    #[test]
    fn test_flag_enabled() {
        assert!(flag_enabled(Some(&json!(true))));
        assert!(flag_enabled(Some(&json!(1))));
        assert!(flag_enabled(Some(&json!("yes"))));
        assert!(!flag_enabled(None));
        assert!(!flag_enabled(Some(&json!(null))));
        assert!(!flag_enabled(Some(&json!(false))));
        assert!(!flag_enabled(Some(&json!(0))));
        assert!(!flag_enabled(Some(&json!(""))));
    }
}
