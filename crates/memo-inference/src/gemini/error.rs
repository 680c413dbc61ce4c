//! Gemini-specific error handling.

use memo_core::Error;

/// Gemini error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiErrorCode {
    /// Missing or invalid API key.
    AuthenticationError,
    /// Quota or rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Prompt rejected as malformed or too large.
    InvalidRequest,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl GeminiErrorCode {
    /// Determine error code from HTTP status and the canonical status string.
    pub fn from_response(status: u16, error_status: &str) -> Self {
        match (status, error_status) {
            (401, _) | (403, "PERMISSION_DENIED") | (_, "UNAUTHENTICATED") => {
                Self::AuthenticationError
            }
            (400, _) if error_status == "INVALID_ARGUMENT" => Self::InvalidRequest,
            (429, _) | (_, "RESOURCE_EXHAUSTED") => Self::RateLimitExceeded,
            (404, _) | (_, "NOT_FOUND") => Self::ModelNotFound,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a Gemini error to a memo-core Error.
pub fn to_memo_error(code: GeminiErrorCode, message: &str) -> Error {
    match code {
        GeminiErrorCode::AuthenticationError => {
            Error::Config(format!("Authentication failed: {}", message))
        }
        GeminiErrorCode::RateLimitExceeded => {
            Error::Generation(format!("Rate limit exceeded: {}", message))
        }
        GeminiErrorCode::ModelNotFound => Error::Config(format!("Model not found: {}", message)),
        GeminiErrorCode::InvalidRequest => {
            Error::Generation(format!("Invalid request: {}", message))
        }
        GeminiErrorCode::ServerError => Error::Generation(format!("Server error: {}", message)),
        GeminiErrorCode::Unknown => Error::Generation(message.to_string()),
    }
}
