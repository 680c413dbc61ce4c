//! Centralized default constants for memo-app.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// GENERATION
// =============================================================================

/// Default Gemini model used for summaries and tags.
pub const GEN_MODEL: &str = "gemini-2.0-flash-001";

/// Default Generative Language API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Output token bound for summary-only generation.
pub const SUMMARY_MAX_OUTPUT_TOKENS: u32 = 200;

/// Output token bound for combined summary and tag generation.
pub const SUMMARY_TAGS_MAX_OUTPUT_TOKENS: u32 = 500;

/// Sampling temperature for both generation variants.
pub const GEN_TEMPERATURE: f32 = 0.7;

/// Generation request timeout in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// MIME type requested for JSON-typed output.
pub const JSON_MIME_TYPE: &str = "application/json";

// =============================================================================
// TAGS
// =============================================================================

/// Maximum number of tags kept from a generated tag list.
pub const MAX_GENERATED_TAGS: usize = 5;

/// Tag substituted when generation yields no tags ("general").
pub const DEFAULT_TAG: &str = "일반";

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

/// Summary returned when the model produced no usable text.
pub const SUMMARY_FALLBACK: &str = "요약을 생성할 수 없습니다.";

/// Generic message for a failed summary-only generation.
pub const SUMMARY_ERROR_MESSAGE: &str = "메모 요약 생성 중 오류가 발생했습니다.";

/// Generic message for a failed summary and tag generation.
pub const SUMMARY_TAGS_ERROR_MESSAGE: &str = "메모 요약 및 태그 생성 중 오류가 발생했습니다.";

/// Validation message when `content` is missing or not text.
pub const CONTENT_REQUIRED_MESSAGE: &str = "메모 내용이 필요합니다.";

/// Validation message when `content` is blank after trimming.
pub const CONTENT_EMPTY_MESSAGE: &str = "요약할 내용이 없습니다.";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default database URL.
pub const DATABASE_URL: &str = "postgres://localhost/memos";

/// Broadcast buffer for the event bus.
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Maximum request body size in bytes.
pub const REQUEST_BODY_LIMIT: usize = 1024 * 1024;

/// CORS origin allowed when none is configured.
pub const CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

// =============================================================================
// SUMMARY CACHE
// =============================================================================

/// Storage key (Redis hash name / namespace) for cached summaries.
pub const SUMMARY_CACHE_KEY: &str = "memo-app-summaries";

/// Entry capacity of the in-process summary cache.
pub const SUMMARY_CACHE_CAPACITY: usize = 1024;

/// Default Redis connection URL.
pub const REDIS_URL: &str = "redis://localhost:6379";
