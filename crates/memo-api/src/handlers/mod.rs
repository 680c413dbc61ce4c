//! HTTP handlers for memo-api.

pub mod health;
pub mod memos;
pub mod summary;
