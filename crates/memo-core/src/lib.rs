//! # memo-core
//!
//! Core types, traits, and abstractions for the memo-app service.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the persistence, inference and API crates depend on.

pub mod defaults;
pub mod error;
pub mod events;
pub mod filter;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{EventBus, EventEnvelope, ServerEvent};
pub use filter::{compute_stats, filter_memos, MemoFilter};
pub use models::*;
pub use tags::{clamp_tags, merge_tags};
pub use traits::*;
