//! Core traits for memo-app abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// MEMO REPOSITORY TRAITS
// =============================================================================

/// Repository for memo CRUD operations.
///
/// Every failure reported by the underlying store surfaces as a persistence
/// error (see [`crate::Error::is_persistence`]); callers decide whether it is
/// fatal.
#[async_trait]
pub trait MemoRepository: Send + Sync {
    /// List all memos, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Memo>>;

    /// Fetch one memo by ID.
    async fn fetch(&self, id: Uuid) -> Result<Option<Memo>>;

    /// Insert a new memo. The store assigns the ID.
    async fn insert(&self, req: CreateMemoRequest) -> Result<Memo>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: Uuid, patch: MemoPatch) -> Result<Memo>;

    /// Delete a memo. Deleting an unknown ID is not an error.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Delete every memo.
    async fn delete_all(&self) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a prompt. An empty string means the model produced nothing.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
