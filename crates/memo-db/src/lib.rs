//! # memo-db
//!
//! Persistence layer for memo-app.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgMemoRepository`] over the `memos` table
//! - [`InMemoryMemoRepository`] with the same contract
//!
//! ## Example
//!
//! ```rust,ignore
//! use memo_db::{Database, MemoRepository, CreateMemoRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/memos").await?;
//!     let memos = db.memos.list().await?;
//!     println!("{} memos", memos.len());
//!     Ok(())
//! }
//! ```

pub mod in_memory;
pub mod memos;
pub mod pool;

// Note: always compiled so integration tests (in tests/) can use it
pub mod test_fixtures;

// Re-export core types
pub use memo_core::*;

pub use in_memory::InMemoryMemoRepository;
pub use memos::{MemoRow, PgMemoRepository};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub memos: PgMemoRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            memos: PgMemoRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
