//! Summary cache keyed by memo id.
//!
//! A write-through mirror of persisted summaries: entries are written only
//! after a summary has been stored, and dropped whenever the memo is
//! updated, deleted or the collection is cleared.
//!
//! Backends:
//! - `disabled`: every operation is a no-op and `get` returns `None`
//! - `memory`: bounded LRU inside the process
//! - `redis`: one hash (`memo-app-summaries`) with a field per memo id
//!
//! Backend failures never propagate. They are logged and treated as a miss.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use memo_core::defaults::SUMMARY_CACHE_KEY;

use crate::config::{CacheConfig, CacheKind};

#[derive(Clone)]
pub struct SummaryCache {
    inner: Arc<Backend>,
}

enum Backend {
    Disabled,
    Memory(Mutex<LruCache<Uuid, String>>),
    Redis { conn: ConnectionManager, key: String },
}

impl SummaryCache {
    /// Build the configured backend. An unreachable Redis falls back to disabled.
    pub async fn from_config(config: &CacheConfig) -> Self {
        match config.kind {
            CacheKind::Disabled => {
                info!(subsystem = "cache", "Summary cache disabled");
                Self::disabled()
            }
            CacheKind::Memory => {
                info!(
                    subsystem = "cache",
                    capacity = config.capacity,
                    "In-memory summary cache enabled"
                );
                Self::memory(config.capacity)
            }
            CacheKind::Redis => match Self::connect_redis(&config.redis_url).await {
                Ok(conn) => {
                    info!(subsystem = "cache", key = SUMMARY_CACHE_KEY, "Redis summary cache enabled");
                    Self::redis(conn)
                }
                Err(e) => {
                    warn!(
                        subsystem = "cache",
                        error = %e,
                        "Failed to connect to Redis, summary cache disabled"
                    );
                    Self::disabled()
                }
            },
        }
    }

    /// Create a disabled cache.
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(Backend::Disabled),
        }
    }

    /// Create an in-process LRU cache holding at most `capacity` entries.
    pub fn memory(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Backend::Memory(Mutex::new(LruCache::new(capacity)))),
        }
    }

    pub fn redis(conn: ConnectionManager) -> Self {
        Self {
            inner: Arc::new(Backend::Redis {
                conn,
                key: SUMMARY_CACHE_KEY.to_string(),
            }),
        }
    }

    async fn connect_redis(url: &str) -> redis::RedisResult<ConnectionManager> {
        let client = redis::Client::open(url)?;
        ConnectionManager::new(client).await
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(*self.inner, Backend::Disabled)
    }

    pub fn backend_name(&self) -> &'static str {
        match *self.inner {
            Backend::Disabled => "disabled",
            Backend::Memory(_) => "memory",
            Backend::Redis { .. } => "redis",
        }
    }

    pub async fn get(&self, memo_id: Uuid) -> Option<String> {
        match &*self.inner {
            Backend::Disabled => None,
            Backend::Memory(lru) => {
                let hit = lock(lru).get(&memo_id).cloned();
                debug!(subsystem = "cache", memo_id = %memo_id, hit = hit.is_some(), "Cache GET");
                hit
            }
            Backend::Redis { conn, key } => {
                let mut conn = conn.clone();
                match conn
                    .hget::<_, _, Option<String>>(key.as_str(), memo_id.to_string())
                    .await
                {
                    Ok(hit) => {
                        debug!(subsystem = "cache", memo_id = %memo_id, hit = hit.is_some(), "Cache GET");
                        hit
                    }
                    Err(e) => {
                        error!(subsystem = "cache", error = %e, "Redis HGET error");
                        None
                    }
                }
            }
        }
    }

    /// Store a summary. Returns false when nothing was written.
    pub async fn set(&self, memo_id: Uuid, summary: &str) -> bool {
        match &*self.inner {
            Backend::Disabled => false,
            Backend::Memory(lru) => {
                lock(lru).put(memo_id, summary.to_string());
                true
            }
            Backend::Redis { conn, key } => {
                let mut conn = conn.clone();
                match conn
                    .hset::<_, _, _, ()>(key.as_str(), memo_id.to_string(), summary)
                    .await
                {
                    Ok(()) => true,
                    Err(e) => {
                        error!(subsystem = "cache", error = %e, "Redis HSET error");
                        false
                    }
                }
            }
        }
    }

    pub async fn delete(&self, memo_id: Uuid) {
        match &*self.inner {
            Backend::Disabled => {}
            Backend::Memory(lru) => {
                lock(lru).pop(&memo_id);
            }
            Backend::Redis { conn, key } => {
                let mut conn = conn.clone();
                if let Err(e) = conn
                    .hdel::<_, _, ()>(key.as_str(), memo_id.to_string())
                    .await
                {
                    error!(subsystem = "cache", error = %e, "Redis HDEL error");
                }
            }
        }
    }

    pub async fn clear_all(&self) {
        match &*self.inner {
            Backend::Disabled => {}
            Backend::Memory(lru) => lock(lru).clear(),
            Backend::Redis { conn, key } => {
                let mut conn = conn.clone();
                if let Err(e) = conn.del::<_, ()>(key.as_str()).await {
                    error!(subsystem = "cache", error = %e, "Redis DEL error");
                }
            }
        }
    }
}

fn lock(lru: &Mutex<LruCache<Uuid, String>>) -> std::sync::MutexGuard<'_, LruCache<Uuid, String>> {
    lru.lock().unwrap_or_else(|e| e.into_inner())
}
