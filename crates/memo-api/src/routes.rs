//! Router assembly and OpenAPI document.

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use memo_core::defaults::REQUEST_BODY_LIMIT;

use crate::handlers::{health, memos, summary};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "memo-app API", description = "Memos with generated summaries and tags"),
    paths(
        health::health_check,
        memos::list_memos,
        memos::create_memo,
        memos::clear_memos,
        memos::memo_stats,
        memos::get_view,
        memos::update_view,
        memos::get_memo,
        memos::update_memo,
        memos::delete_memo,
        memos::get_enrichment,
        summary::summarize_memo,
        summary::summarize_content,
        summary::get_memo_summary,
    ),
    components(schemas(
        memo_core::Memo,
        memo_core::MemoCategory,
        memo_core::MemoFormData,
        memo_core::MemoStats,
        memo_core::EnrichmentStatus,
        crate::services::GeneratedSummary,
        crate::services::MemoView,
        memos::ViewUpdate,
        summary::SummaryRequest,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "memos", description = "Memo CRUD and session view"),
        (name = "summary", description = "Summary and tag generation"),
    )
)]
pub struct ApiDoc;

/// Generate UUIDv7 request IDs so they sort by arrival time in logs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse configured CORS origins, skipping entries that are not valid header values.
pub fn parse_allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// Routes only, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/memos",
            get(memos::list_memos)
                .post(memos::create_memo)
                .delete(memos::clear_memos),
        )
        .route("/memos/stats", get(memos::memo_stats))
        .route("/memos/view", get(memos::get_view).put(memos::update_view))
        .route("/memos/summary", post(summary::summarize_content))
        .route(
            "/memos/:id",
            get(memos::get_memo)
                .put(memos::update_memo)
                .delete(memos::delete_memo),
        )
        .route(
            "/memos/:id/summary",
            get(summary::get_memo_summary).post(summary::summarize_memo),
        )
        .route("/memos/:id/enrichment", get(memos::get_enrichment))
}

/// Full application: routes, Swagger UI and the middleware stack.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(cors_origins)))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT, HeaderName::from_static("x-request-id")])
        .max_age(std::time::Duration::from_secs(3600));

    api_routes()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT))
        .with_state(state)
}
