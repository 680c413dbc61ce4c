//! # memo-api
//!
//! HTTP server for memo-app: memo CRUD over a persistent store, generated
//! summaries and tags, a summary cache and session view state.
//!
//! The binary in `main.rs` wires configuration, tracing, the store and the
//! Gemini backend together; everything else lives here so tests can build
//! the router against in-memory collaborators.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use routes::{build_router, ApiDoc};
pub use state::AppState;
