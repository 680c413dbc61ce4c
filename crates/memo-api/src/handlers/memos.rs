//! Memo CRUD and view-state handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use memo_core::{CategoryFilter, EnrichmentStatus, Memo, MemoFilter, MemoFormData, MemoStats};

use crate::services::MemoView;
use crate::{ApiError, AppState};

/// Query parameters for listing memos.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMemosQuery {
    /// Case-insensitive substring over title, content and tags.
    pub q: Option<String>,
    /// `all` or one of `personal`, `work`, `study`, `idea`, `other`.
    pub category: Option<String>,
}

/// Partial change to the session view. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ViewUpdate {
    pub query: Option<String>,
    pub category: Option<String>,
}

fn parse_category(raw: Option<&str>) -> Result<CategoryFilter, ApiError> {
    match raw {
        None => Ok(CategoryFilter::All),
        Some(s) => s.parse::<CategoryFilter>().map_err(ApiError::BadRequest),
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Memo {} not found", id))
}

/// List memos, newest first, optionally filtered.
///
/// Does not change the session view.
#[utoipa::path(
    get,
    path = "/memos",
    tag = "memos",
    params(ListMemosQuery),
    responses(
        (status = 200, description = "Matching memos", body = [Memo]),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn list_memos(
    State(state): State<AppState>,
    query: Result<Query<ListMemosQuery>, QueryRejection>,
) -> Result<Json<Vec<Memo>>, ApiError> {
    let Query(query) = query?;
    let filter = MemoFilter::new(
        query.q.unwrap_or_default(),
        parse_category(query.category.as_deref())?,
    );
    Ok(Json(state.service.list_filtered(&filter).await))
}

/// Create a memo. Tag enrichment continues in the background.
#[utoipa::path(
    post,
    path = "/memos",
    tag = "memos",
    request_body = MemoFormData,
    responses(
        (status = 201, description = "Memo created", body = Memo),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_memo(
    State(state): State<AppState>,
    payload: Result<Json<MemoFormData>, JsonRejection>,
) -> Result<(StatusCode, Json<Memo>), ApiError> {
    let Json(form) = payload?;
    let created = state.service.create(form).await?;
    Ok((StatusCode::CREATED, Json(created.memo)))
}

/// Delete every memo and reset the session view.
#[utoipa::path(
    delete,
    path = "/memos",
    tag = "memos",
    responses(
        (status = 204, description = "All memos deleted"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn clear_memos(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.service.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/memos/stats",
    tag = "memos",
    responses((status = 200, description = "Collection statistics", body = MemoStats))
)]
pub async fn memo_stats(State(state): State<AppState>) -> Json<MemoStats> {
    Json(state.service.stats().await)
}

#[utoipa::path(
    get,
    path = "/memos/view",
    tag = "memos",
    responses((status = 200, description = "Current session view", body = MemoView))
)]
pub async fn get_view(State(state): State<AppState>) -> Json<MemoView> {
    Json(state.service.view().await)
}

/// Set the session search query and/or category filter.
#[utoipa::path(
    put,
    path = "/memos/view",
    tag = "memos",
    request_body = ViewUpdate,
    responses(
        (status = 200, description = "Updated session view", body = MemoView),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn update_view(
    State(state): State<AppState>,
    payload: Result<Json<ViewUpdate>, JsonRejection>,
) -> Result<Json<MemoView>, ApiError> {
    let Json(update) = payload?;
    // Validate before touching state so a bad category changes nothing
    let category = update
        .category
        .as_deref()
        .map(|c| parse_category(Some(c)))
        .transpose()?;

    if let Some(query) = update.query {
        state.service.search(query).await;
    }
    if let Some(category) = category {
        state.service.filter_by_category(category).await;
    }
    Ok(Json(state.service.view().await))
}

#[utoipa::path(
    get,
    path = "/memos/{id}",
    tag = "memos",
    params(("id" = Uuid, Path, description = "Memo id")),
    responses(
        (status = 200, description = "The memo", body = Memo),
        (status = 404, description = "Unknown memo")
    )
)]
pub async fn get_memo(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Memo>, ApiError> {
    let Path(id) = id?;
    state
        .service
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// Replace a memo's fields. The stored summary is cleared and regenerated
/// in the background.
#[utoipa::path(
    put,
    path = "/memos/{id}",
    tag = "memos",
    params(("id" = Uuid, Path, description = "Memo id")),
    request_body = MemoFormData,
    responses(
        (status = 200, description = "Memo updated", body = Memo),
        (status = 404, description = "Unknown memo"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn update_memo(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MemoFormData>, JsonRejection>,
) -> Result<Json<Memo>, ApiError> {
    let Path(id) = id?;
    let Json(form) = payload?;
    let updated = state.service.update(id, form).await?;
    Ok(Json(updated.memo))
}

#[utoipa::path(
    delete,
    path = "/memos/{id}",
    tag = "memos",
    params(("id" = Uuid, Path, description = "Memo id")),
    responses(
        (status = 204, description = "Memo deleted"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_memo(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Status of the background tag enrichment for a memo.
#[utoipa::path(
    get,
    path = "/memos/{id}/enrichment",
    tag = "memos",
    params(("id" = Uuid, Path, description = "Memo id")),
    responses(
        (status = 200, description = "Enrichment status", body = EnrichmentStatus),
        (status = 404, description = "No enrichment recorded for this memo")
    )
)]
pub async fn get_enrichment(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<EnrichmentStatus>, ApiError> {
    let Path(id) = id?;
    state
        .service
        .enrichment_status(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No enrichment for memo {}", id)))
}
