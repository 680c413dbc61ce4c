//! Gemini inference backend.
//!
//! Talks to the Generative Language REST API:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: <GEMINI_API_KEY>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use memo_inference::gemini::{GeminiBackend, GeminiConfig};
//!
//! let backend = GeminiBackend::new(GeminiConfig::with_api_key("secret")).unwrap();
//! ```

mod backend;
mod error;
mod types;

pub use backend::{GeminiBackend, GeminiConfig};
pub use error::{to_memo_error, GeminiErrorCode};
pub use types::*;
