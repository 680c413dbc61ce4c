//! Error types for memo-app.

use thiserror::Error;

/// Result type alias using memo-app's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for memo-app operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A non-SQL store reported failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Memo not found
    #[error("Memo not found: {0}")]
    MemoNotFound(uuid::Uuid),

    /// Text generation failed. The message is user-facing.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures reported by the memo store.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Persistence(_) | Error::MemoNotFound(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_memo_not_found() {
        let id = Uuid::nil();
        let err = Error::MemoNotFound(id);
        assert_eq!(err.to_string(), format!("Memo not found: {}", id));
    }

    #[test]
    fn test_error_display_generation() {
        let err = Error::Generation("model unavailable".to_string());
        assert_eq!(err.to_string(), "Generation error: model unavailable");
    }

    #[test]
    fn test_error_display_persistence() {
        let err = Error::Persistence("store offline".to_string());
        assert_eq!(err.to_string(), "Persistence error: store offline");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty content".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty content");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_is_persistence() {
        assert!(Error::Persistence("x".to_string()).is_persistence());
        assert!(Error::MemoNotFound(Uuid::nil()).is_persistence());
        assert!(Error::Database(sqlx::Error::RowNotFound).is_persistence());
        assert!(!Error::Generation("x".to_string()).is_persistence());
        assert!(!Error::InvalidInput("x".to_string()).is_persistence());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
