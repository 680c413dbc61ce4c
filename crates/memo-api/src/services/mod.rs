//! Service layer for business logic.

pub mod locks;
pub mod memo_service;
pub mod summary_cache;

pub use locks::MemoLocks;
pub use memo_service::{
    EnrichmentHandle, EnrichmentOutcome, GeneratedSummary, MemoMutation, MemoService, MemoView,
};
pub use summary_cache::SummaryCache;
