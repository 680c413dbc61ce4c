//! # memo-inference
//!
//! Generative-AI summary and tag generation for memo-app.
//!
//! This crate provides:
//! - Gemini `generateContent` backend
//! - The two instruction prompts (summary, summary + tags)
//! - A tagged two-path parser for the model's semi-structured output
//! - [`Summarizer`], the client the API layer calls
//! - A scripted mock backend (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use memo_inference::{GeminiBackend, Summarizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GeminiBackend::from_env().unwrap();
//!     let summarizer = Summarizer::new(Arc::new(backend));
//!     let result = summarizer.generate_summary_and_tags("회의 메모").await.unwrap();
//!     println!("{} {:?}", result.summary, result.tags);
//! }
//! ```

pub mod gemini;
pub mod parser;
pub mod prompts;
pub mod summarizer;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gemini::{GeminiBackend, GeminiConfig, GeminiErrorCode};
pub use parser::{parse_summary_and_tags, ParsedResponse};
pub use summarizer::Summarizer;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockGenerationBackend, MockReply};
