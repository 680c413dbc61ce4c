//! Memo orchestration.
//!
//! [`MemoService`] is the single writer of the in-memory memo collection and
//! the session view state (search query and category filter). Every mutation
//! goes through the repository first and updates local state only after the
//! store accepted it.
//!
//! Create and update schedule a background enrichment task that generates a
//! summary and tags, merges the tags with the user's own, and persists the
//! result. The caller's operation never waits for it. Each memo carries a
//! revision counter bumped on every user edit; an enrichment started for an
//! older revision is discarded as superseded instead of overwriting newer
//! content.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use memo_core::{
    compute_stats, filter_memos, merge_tags, CategoryFilter, CreateMemoRequest, EnrichmentStatus,
    Error, EventBus, Memo, MemoFilter, MemoFormData, MemoPatch, MemoRepository, MemoStats, Result,
    ServerEvent,
};
use memo_inference::Summarizer;

use super::locks::MemoLocks;
use super::summary_cache::SummaryCache;

/// Outcome of one background enrichment run.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Merged tags and summary were persisted.
    Applied(Memo),
    /// A newer edit landed first; nothing was written.
    Superseded,
    /// The memo was deleted or the collection cleared meanwhile.
    Skipped,
    /// Generation or persistence failed. The memo keeps its pre-merge tags.
    Failed { error: String },
}

/// Awaitable handle on a detached enrichment task.
#[derive(Debug)]
pub struct EnrichmentHandle {
    memo_id: Uuid,
    task: JoinHandle<EnrichmentOutcome>,
}

impl EnrichmentHandle {
    pub fn memo_id(&self) -> Uuid {
        self.memo_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task. Dropping the handle instead leaves it running.
    pub async fn outcome(self) -> EnrichmentOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => EnrichmentOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Result of a create or update.
#[derive(Debug)]
pub struct MemoMutation {
    /// The memo as persisted, before enrichment.
    pub memo: Memo,
    pub enrichment: EnrichmentHandle,
}

/// Generated content returned by the memo-scoped summary operation.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GeneratedSummary {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Snapshot of the session view.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MemoView {
    pub query: String,
    pub category: String,
    pub memos: Vec<Memo>,
    pub stats: MemoStats,
}

#[derive(Default)]
struct MemoState {
    /// Newest `created_at` first.
    memos: Vec<Memo>,
    filter: MemoFilter,
    revisions: HashMap<Uuid, u64>,
    enrichment: HashMap<Uuid, EnrichmentStatus>,
}

impl MemoState {
    fn upsert(&mut self, memo: Memo) {
        if let Some(slot) = self.memos.iter_mut().find(|m| m.id == memo.id) {
            *slot = memo;
            return;
        }
        let pos = self
            .memos
            .iter()
            .position(|m| m.created_at < memo.created_at)
            .unwrap_or(self.memos.len());
        self.memos.insert(pos, memo);
    }

    fn bump_revision(&mut self, id: Uuid) -> u64 {
        let revision = self.revisions.entry(id).or_insert(0);
        *revision += 1;
        *revision
    }

    fn is_current(&self, id: Uuid, revision: u64) -> Option<bool> {
        self.revisions.get(&id).map(|r| *r == revision)
    }
}

struct Inner {
    repo: Arc<dyn MemoRepository>,
    summarizer: Summarizer,
    cache: SummaryCache,
    events: Arc<EventBus>,
    state: RwLock<MemoState>,
    locks: MemoLocks,
}

/// Orchestrates persistence, generation, the summary cache and view state.
#[derive(Clone)]
pub struct MemoService {
    inner: Arc<Inner>,
}

impl MemoService {
    pub fn new(
        repo: Arc<dyn MemoRepository>,
        summarizer: Summarizer,
        cache: SummaryCache,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                repo,
                summarizer,
                cache,
                events,
                state: RwLock::new(MemoState::default()),
                locks: MemoLocks::new(),
            }),
        }
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.inner.events
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.inner.cache
    }

    /// Replace the in-memory collection with the store's contents.
    pub async fn load(&self) -> Result<usize> {
        let memos = self.inner.repo.list().await?;
        let count = memos.len();
        let mut state = self.inner.state.write().await;
        state.revisions = memos.iter().map(|m| (m.id, 0)).collect();
        state.memos = memos;
        state.enrichment.clear();
        info!(
            subsystem = "service",
            component = "memo_service",
            op = "load",
            result_count = count,
            "Memos loaded"
        );
        Ok(count)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Persist a new memo and schedule enrichment.
    pub async fn create(&self, form: MemoFormData) -> Result<MemoMutation> {
        let content = form.content.clone();
        let user_tags = form.tags.clone();

        let memo = self
            .inner
            .repo
            .insert(CreateMemoRequest::from_form(form, Utc::now()))
            .await?;

        let revision = {
            let mut state = self.inner.state.write().await;
            state.upsert(memo.clone());
            state.enrichment.insert(memo.id, EnrichmentStatus::Pending);
            state.bump_revision(memo.id)
        };

        info!(
            subsystem = "service",
            op = "create",
            memo_id = %memo.id,
            "Memo created"
        );
        self.inner
            .events
            .emit(ServerEvent::MemoCreated { memo_id: memo.id });

        let enrichment = self.spawn_enrichment(memo.id, content, user_tags, revision);
        Ok(MemoMutation { memo, enrichment })
    }

    /// Replace a memo's user fields, clear its stale summary and schedule enrichment.
    pub async fn update(&self, id: Uuid, form: MemoFormData) -> Result<MemoMutation> {
        let content = form.content.clone();
        let user_tags = form.tags.clone();

        let (memo, revision) = {
            let _guard = self.inner.locks.acquire(id).await;
            let memo = self
                .inner
                .repo
                .update(id, MemoPatch::from_form(form, Utc::now()))
                .await?;

            let revision = {
                let mut state = self.inner.state.write().await;
                state.upsert(memo.clone());
                state.enrichment.insert(id, EnrichmentStatus::Pending);
                state.bump_revision(id)
            };
            self.inner.cache.delete(id).await;
            (memo, revision)
        };

        info!(
            subsystem = "service",
            op = "update",
            memo_id = %id,
            revision,
            "Memo updated"
        );
        self.inner.events.emit(ServerEvent::MemoUpdated {
            memo_id: id,
            tags: memo.tags.clone(),
            has_summary: memo.summary.is_some(),
        });

        let enrichment = self.spawn_enrichment(id, content, user_tags, revision);
        Ok(MemoMutation { memo, enrichment })
    }

    /// Delete a memo. Store failures propagate and leave local state untouched.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        {
            let _guard = self.inner.locks.acquire(id).await;
            self.inner.repo.delete(id).await?;

            let mut state = self.inner.state.write().await;
            state.memos.retain(|m| m.id != id);
            state.revisions.remove(&id);
            state.enrichment.remove(&id);
        }
        self.inner.locks.remove(id);
        self.inner.cache.delete(id).await;

        info!(subsystem = "service", op = "delete", memo_id = %id, "Memo deleted");
        self.inner
            .events
            .emit(ServerEvent::MemoDeleted { memo_id: id });
        Ok(())
    }

    /// Wipe the store, then reset collection, query and category filter.
    pub async fn clear_all(&self) -> Result<()> {
        self.inner.repo.delete_all().await?;

        *self.inner.state.write().await = MemoState::default();
        self.inner.locks.clear();
        self.inner.cache.clear_all().await;

        info!(subsystem = "service", op = "clear_all", "All memos cleared");
        self.inner.events.emit(ServerEvent::MemosCleared);
        Ok(())
    }

    // =========================================================================
    // VIEW STATE
    // =========================================================================

    pub async fn search(&self, query: impl Into<String>) {
        self.inner.state.write().await.filter.query = query.into();
    }

    pub async fn filter_by_category(&self, category: CategoryFilter) {
        self.inner.state.write().await.filter.category = category;
    }

    pub async fn current_filter(&self) -> MemoFilter {
        self.inner.state.read().await.filter.clone()
    }

    /// Memos matching the session filter, newest first.
    pub async fn filtered(&self) -> Vec<Memo> {
        let state = self.inner.state.read().await;
        filter_memos(&state.memos, &state.filter)
    }

    /// Memos matching an ad-hoc filter. Session state is not touched.
    pub async fn list_filtered(&self, filter: &MemoFilter) -> Vec<Memo> {
        filter_memos(&self.inner.state.read().await.memos, filter)
    }

    pub async fn stats(&self) -> MemoStats {
        let state = self.inner.state.read().await;
        compute_stats(&state.memos, &state.filter)
    }

    pub async fn view(&self) -> MemoView {
        let state = self.inner.state.read().await;
        MemoView {
            query: state.filter.query.clone(),
            category: state.filter.category.to_string(),
            memos: filter_memos(&state.memos, &state.filter),
            stats: compute_stats(&state.memos, &state.filter),
        }
    }

    /// Look up a memo in the in-memory collection.
    pub async fn get_by_id(&self, id: Uuid) -> Option<Memo> {
        self.inner
            .state
            .read()
            .await
            .memos
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub async fn all(&self) -> Vec<Memo> {
        self.inner.state.read().await.memos.clone()
    }

    pub async fn enrichment_status(&self, id: Uuid) -> Option<EnrichmentStatus> {
        self.inner.state.read().await.enrichment.get(&id).cloned()
    }

    // =========================================================================
    // GENERATION
    // =========================================================================

    /// Stateless summary of arbitrary content.
    pub async fn summarize(&self, content: &str) -> Result<String> {
        self.inner.summarizer.generate_summary(content).await
    }

    /// Generate for a memo and persist the result.
    ///
    /// A failed persist is logged and the generated content is still
    /// returned. Generation failures propagate.
    pub async fn generate_for_memo(
        &self,
        memo_id: &str,
        content: &str,
        generate_tags: bool,
    ) -> Result<GeneratedSummary> {
        let generated = if generate_tags {
            let result = self.inner.summarizer.generate_summary_and_tags(content).await?;
            GeneratedSummary {
                summary: result.summary,
                tags: Some(result.tags),
            }
        } else {
            GeneratedSummary {
                summary: self.inner.summarizer.generate_summary(content).await?,
                tags: None,
            }
        };

        let saved = match Uuid::parse_str(memo_id) {
            Ok(id) => self
                .save_generated(id, generated.summary.clone(), generated.tags.clone())
                .await
                .map(|_| ()),
            Err(e) => Err(Error::InvalidInput(format!("invalid memo id {:?}: {}", memo_id, e))),
        };
        if let Err(e) = saved {
            error!(
                subsystem = "service",
                op = "save_generated",
                memo_id = %memo_id,
                error = %e,
                "Failed to save generated summary"
            );
        }

        Ok(generated)
    }

    /// Persist a generated summary (and tags, when given) for a memo.
    ///
    /// In-memory state and the cache are only touched while the memo is still
    /// tracked, so a concurrent clear-all or delete is not undone.
    pub async fn save_generated(
        &self,
        id: Uuid,
        summary: String,
        tags: Option<Vec<String>>,
    ) -> Result<Memo> {
        let _guard = self.inner.locks.acquire(id).await;
        let memo = self
            .inner
            .repo
            .update(
                id,
                MemoPatch::generated(summary, tags).with_updated_at(Utc::now()),
            )
            .await?;

        let mut state = self.inner.state.write().await;
        if !state.revisions.contains_key(&id) {
            warn!(
                subsystem = "service",
                op = "save_generated",
                memo_id = %id,
                "Memo no longer tracked, skipping state and cache"
            );
            return Ok(memo);
        }
        state.upsert(memo.clone());
        if let Some(summary) = &memo.summary {
            self.inner.cache.set(id, summary).await;
        }
        drop(state);

        debug!(subsystem = "service", op = "save_generated", memo_id = %id, "Generated summary saved");
        self.inner
            .events
            .emit(ServerEvent::SummaryGenerated { memo_id: id });
        Ok(memo)
    }

    /// Summary for a memo: cache first, then the persisted field.
    pub async fn cached_summary(&self, id: Uuid) -> Result<Option<String>> {
        if let Some(summary) = self.inner.cache.get(id).await {
            return Ok(Some(summary));
        }

        let persisted = match self.get_by_id(id).await {
            Some(memo) => memo.summary,
            None => self.inner.repo.fetch(id).await?.and_then(|m| m.summary),
        };

        if let Some(summary) = &persisted {
            self.inner.cache.set(id, summary).await;
        }
        Ok(persisted)
    }

    // =========================================================================
    // ENRICHMENT
    // =========================================================================

    fn spawn_enrichment(
        &self,
        memo_id: Uuid,
        content: String,
        user_tags: Vec<String>,
        revision: u64,
    ) -> EnrichmentHandle {
        let service = self.clone();
        let task = tokio::spawn(async move {
            service
                .enrich(memo_id, &content, &user_tags, revision)
                .await
        });
        EnrichmentHandle { memo_id, task }
    }

    async fn enrich(
        &self,
        memo_id: Uuid,
        content: &str,
        user_tags: &[String],
        revision: u64,
    ) -> EnrichmentOutcome {
        let start = Instant::now();

        let generated = match self.inner.summarizer.generate_summary_and_tags(content).await {
            Ok(generated) => generated,
            Err(e) => return self.enrichment_failed(memo_id, revision, e).await,
        };
        let merged = merge_tags(user_tags, &generated.tags);

        let _guard = self.inner.locks.acquire(memo_id).await;
        let current = self.inner.state.read().await.is_current(memo_id, revision);
        match current {
            None => return EnrichmentOutcome::Skipped,
            Some(false) => return self.enrichment_superseded(memo_id),
            Some(true) => {}
        }

        let patch = MemoPatch::generated(generated.summary, Some(merged)).with_updated_at(Utc::now());
        let memo = match self.inner.repo.update(memo_id, patch).await {
            Ok(memo) => memo,
            Err(e) => return self.enrichment_failed(memo_id, revision, e).await,
        };

        {
            let mut state = self.inner.state.write().await;
            if state.is_current(memo_id, revision) != Some(true) {
                return EnrichmentOutcome::Skipped;
            }
            state.upsert(memo.clone());
            state.enrichment.insert(
                memo_id,
                EnrichmentStatus::Completed {
                    tags: memo.tags.clone(),
                },
            );
        }
        if let Some(summary) = &memo.summary {
            self.inner.cache.set(memo_id, summary).await;
        }

        info!(
            subsystem = "service",
            op = "enrich",
            memo_id = %memo_id,
            tag_count = memo.tags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Memo enriched"
        );
        self.inner.events.emit(ServerEvent::TagsEnriched {
            memo_id,
            tags: memo.tags.clone(),
        });
        EnrichmentOutcome::Applied(memo)
    }

    fn enrichment_superseded(&self, memo_id: Uuid) -> EnrichmentOutcome {
        debug!(subsystem = "service", op = "enrich", memo_id = %memo_id, "Enrichment superseded by newer edit");
        self.inner
            .events
            .emit(ServerEvent::EnrichmentSuperseded { memo_id });
        EnrichmentOutcome::Superseded
    }

    async fn enrichment_failed(&self, memo_id: Uuid, revision: u64, err: Error) -> EnrichmentOutcome {
        let error = err.to_string();
        {
            let mut state = self.inner.state.write().await;
            let current = state.is_current(memo_id, revision);
            match current {
                None => return EnrichmentOutcome::Skipped,
                Some(false) => {
                    drop(state);
                    return self.enrichment_superseded(memo_id);
                }
                Some(true) => {
                    state.enrichment.insert(
                        memo_id,
                        EnrichmentStatus::Failed {
                            error: error.clone(),
                        },
                    );
                }
            }
        }

        warn!(
            subsystem = "service",
            op = "enrich",
            memo_id = %memo_id,
            error = %error,
            "Tag enrichment failed"
        );
        self.inner.events.emit(ServerEvent::EnrichmentFailed {
            memo_id,
            error: error.clone(),
        });
        EnrichmentOutcome::Failed { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use memo_db::InMemoryMemoRepository;
    use memo_inference::{MockGenerationBackend, MockReply};

    fn service_with(
        repo: Arc<InMemoryMemoRepository>,
        backend: MockGenerationBackend,
    ) -> MemoService {
        MemoService::new(
            repo,
            Summarizer::new(Arc::new(backend)),
            SummaryCache::memory(16),
            Arc::new(EventBus::default()),
        )
    }

    fn form(title: &str, content: &str, tags: &[&str]) -> MemoFormData {
        MemoFormData {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_upsert_keeps_newest_first() {
        let now = Utc::now();
        let memo = |offset: i64| Memo {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            category: Default::default(),
            tags: vec![],
            summary: None,
            created_at: now + Duration::seconds(offset),
            updated_at: now + Duration::seconds(offset),
        };
        let mut state = MemoState::default();
        for offset in [1, 3, 2] {
            state.upsert(memo(offset));
        }
        let order: Vec<i64> = state
            .memos
            .iter()
            .map(|m| (m.created_at - now).num_seconds())
            .collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_enrichment_merges_user_tags_first() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let backend = MockGenerationBackend::new()
            .with_response(r#"{"summary":"S","tags":["work","urgent"]}"#);
        let service = service_with(repo.clone(), backend);

        let created = service
            .create(form("t", "content", &["work"]))
            .await
            .unwrap();
        assert_eq!(created.memo.tags, vec!["work".to_string()]);

        let outcome = created.enrichment.outcome().await;
        let EnrichmentOutcome::Applied(memo) = outcome else {
            panic!("expected applied, got {:?}", outcome);
        };
        assert_eq!(memo.tags, vec!["work".to_string(), "urgent".to_string()]);
        assert_eq!(memo.summary.as_deref(), Some("S"));

        let stored = repo.fetch(memo.id).await.unwrap().unwrap();
        assert_eq!(stored.tags, vec!["work".to_string(), "urgent".to_string()]);
        assert_eq!(
            service.enrichment_status(memo.id).await,
            Some(EnrichmentStatus::Completed {
                tags: vec!["work".to_string(), "urgent".to_string()]
            })
        );
        assert_eq!(service.cache().get(memo.id).await.as_deref(), Some("S"));
    }

    #[tokio::test]
    async fn test_enrichment_failure_keeps_create_successful() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new().with_failure("down"));

        let created = service.create(form("t", "c", &["mine"])).await.unwrap();
        let id = created.memo.id;
        assert!(matches!(
            created.enrichment.outcome().await,
            EnrichmentOutcome::Failed { .. }
        ));

        let memo = service.get_by_id(id).await.unwrap();
        assert_eq!(memo.tags, vec!["mine".to_string()]);
        assert!(memo.summary.is_none());
        assert!(matches!(
            service.enrichment_status(id).await,
            Some(EnrichmentStatus::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_enrichment_is_superseded() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let backend = MockGenerationBackend::new()
            .with_reply_for(
                "first draft",
                MockReply::text(r#"{"summary":"old","tags":["old"]}"#).delayed_ms(150),
            )
            .with_response(r#"{"summary":"new","tags":["new"]}"#);
        let service = service_with(repo.clone(), backend);
        let mut events = service.events().subscribe();

        let created = service.create(form("t", "first draft", &[])).await.unwrap();
        let id = created.memo.id;
        let updated = service
            .update(id, form("t", "second version", &[]))
            .await
            .unwrap();

        assert!(matches!(
            updated.enrichment.outcome().await,
            EnrichmentOutcome::Applied(_)
        ));
        assert_eq!(created.enrichment.outcome().await, EnrichmentOutcome::Superseded);

        let stored = repo.fetch(id).await.unwrap().unwrap();
        assert_eq!(stored.summary.as_deref(), Some("new"));
        assert_eq!(stored.tags, vec!["new".to_string()]);

        let mut saw_superseded = false;
        while let Ok(envelope) = events.try_recv() {
            if envelope.event_type == "enrichment.superseded" {
                saw_superseded = true;
            }
        }
        assert!(saw_superseded);
    }

    #[tokio::test]
    async fn test_update_clears_summary_and_cache() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new().with_failure("off"));

        let created = service.create(form("t", "c", &[])).await.unwrap();
        let id = created.memo.id;
        created.enrichment.outcome().await;
        service
            .save_generated(id, "S".to_string(), None)
            .await
            .unwrap();
        assert_eq!(service.cached_summary(id).await.unwrap().as_deref(), Some("S"));

        let updated = service.update(id, form("t2", "c2", &[])).await.unwrap();
        assert!(updated.memo.summary.is_none());
        assert!(service.cache().get(id).await.is_none());
        updated.enrichment.outcome().await;
        assert!(service.cached_summary(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_then_lookup_is_none() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new());

        let created = service.create(form("t", "c", &[])).await.unwrap();
        let id = created.memo.id;
        created.enrichment.outcome().await;

        service.delete(id).await.unwrap();
        assert!(service.get_by_id(id).await.is_none());
        assert!(repo.fetch(id).await.unwrap().is_none());
        assert!(service.enrichment_status(id).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_propagates() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new());

        let created = service.create(form("t", "c", &[])).await.unwrap();
        let id = created.memo.id;
        created.enrichment.outcome().await;

        repo.set_fail_deletes(true);
        let err = service.delete(id).await.unwrap_err();
        assert!(err.is_persistence());
        assert!(service.get_by_id(id).await.is_some());
    }

    #[tokio::test]
    async fn test_clear_all_resets_view_state() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new());

        service.create(form("a", "x", &[])).await.unwrap().enrichment.outcome().await;
        service.search("a").await;
        service
            .filter_by_category(CategoryFilter::Only(memo_core::MemoCategory::Work))
            .await;

        service.clear_all().await.unwrap();
        assert!(service.all().await.is_empty());
        assert!(repo.is_empty());
        assert_eq!(service.current_filter().await, MemoFilter::default());
    }

    #[tokio::test]
    async fn test_view_and_stats_follow_filter() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo, MockGenerationBackend::new().with_failure("off"));

        let mut work = form("Standup", "sprint", &[]);
        work.category = memo_core::MemoCategory::Work;
        service.create(work).await.unwrap();
        service.create(form("Groceries", "milk", &[])).await.unwrap();

        service.search("STAND").await;
        let view = service.view().await;
        assert_eq!(view.query, "STAND");
        assert_eq!(view.category, "all");
        assert_eq!(view.memos.len(), 1);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.stats.filtered, 1);
        assert_eq!(view.stats.by_category.get("work"), Some(&1));
        assert_eq!(view.stats.by_category.get("other"), Some(&1));
    }

    #[tokio::test]
    async fn test_generate_for_memo_swallows_persist_failure() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let backend =
            MockGenerationBackend::new().with_response(r#"{"summary":"S","tags":["x"]}"#);
        let service = service_with(repo.clone(), backend);

        let created = service.create(form("t", "c", &[])).await.unwrap();
        let id = created.memo.id;
        created.enrichment.outcome().await;
        let before = repo.fetch(id).await.unwrap().unwrap();

        repo.set_fail_updates(true);
        let generated = service
            .generate_for_memo(&id.to_string(), "c", true)
            .await
            .unwrap();
        assert_eq!(generated.summary, "S");
        assert_eq!(generated.tags, Some(vec!["x".to_string()]));
        assert_eq!(repo.fetch(id).await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_load_reads_store() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        repo.insert(memo_db::test_fixtures::create_request("seed", Utc::now()))
            .await
            .unwrap();
        let service = service_with(repo, MockGenerationBackend::new());

        assert_eq!(service.load().await.unwrap(), 1);
        assert_eq!(service.all().await[0].title, "seed");
    }

    #[tokio::test]
    async fn test_generate_for_memo_with_non_uuid_id_still_returns_summary() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let backend = MockGenerationBackend::new().with_response("요약");
        let service = service_with(repo.clone(), backend);

        let generated = service
            .generate_for_memo("abc-123", "content", false)
            .await
            .unwrap();
        assert_eq!(generated.summary, "요약");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_save_generated_does_not_track_untracked_memo() {
        let repo = Arc::new(InMemoryMemoRepository::new());
        let service = service_with(repo.clone(), MockGenerationBackend::new());
        service.load().await.unwrap();

        // Stored but not tracked, as after a clear-all that raced the save
        let stored = repo
            .insert(memo_db::test_fixtures::create_request("late", Utc::now()))
            .await
            .unwrap();

        let saved = service
            .save_generated(stored.id, "S".to_string(), None)
            .await
            .unwrap();
        assert_eq!(saved.summary.as_deref(), Some("S"));
        assert!(service.get_by_id(stored.id).await.is_none());
        assert_eq!(service.stats().await.total, 0);
        assert_eq!(service.cache().get(stored.id).await, None);
    }
}
