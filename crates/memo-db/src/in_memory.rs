//! Process-local memo store.
//!
//! Implements the same contract as [`crate::PgMemoRepository`]. Used for
//! `MEMO_STORE=memory` runs and as the store behind service and HTTP tests,
//! where the failure switches simulate a store that rejects writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use memo_core::{
    normalize_summary, CreateMemoRequest, Error, Memo, MemoPatch, MemoRepository, Result,
};

#[derive(Default)]
pub struct InMemoryMemoRepository {
    /// Insertion order; listing sorts it.
    memos: Mutex<Vec<Memo>>,
    fail_lists: AtomicBool,
    fail_inserts: AtomicBool,
    fail_updates: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryMemoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `list` fail.
    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Make `insert` fail.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make `update` fail.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make `delete` and `delete_all` fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Memo>> {
        self.memos.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Persistence(format!("{} rejected by store", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl MemoRepository for InMemoryMemoRepository {
    async fn list(&self) -> Result<Vec<Memo>> {
        Self::check(&self.fail_lists, "list")?;
        let mut memos: Vec<Memo> = self.lock().iter().rev().cloned().collect();
        // Stable: equal timestamps keep the most recent insert first
        memos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(memos)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Memo>> {
        Ok(self.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, req: CreateMemoRequest) -> Result<Memo> {
        Self::check(&self.fail_inserts, "insert")?;
        let memo = Memo {
            id: Uuid::now_v7(),
            title: req.title,
            content: req.content,
            category: req.category,
            tags: req.tags,
            summary: normalize_summary(req.summary),
            created_at: req.created_at,
            updated_at: req.updated_at.max(req.created_at),
        };
        self.lock().push(memo.clone());
        Ok(memo)
    }

    async fn update(&self, id: Uuid, patch: MemoPatch) -> Result<Memo> {
        Self::check(&self.fail_updates, "update")?;
        let mut memos = self.lock();
        let memo = memos
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::MemoNotFound(id))?;
        patch.apply_to(memo);
        Ok(memo.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        Self::check(&self.fail_deletes, "delete")?;
        self.lock().retain(|m| m.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        Self::check(&self.fail_deletes, "delete_all")?;
        self.lock().clear();
        Ok(())
    }
}
