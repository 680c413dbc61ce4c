//! Shared handler state.

use std::time::Instant;

use crate::services::MemoService;

/// Cloned into every handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub service: MemoService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: MemoService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}
