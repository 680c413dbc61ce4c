//! Memo repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use memo_core::{
    normalize_summary, CreateMemoRequest, Error, Memo, MemoCategory, MemoPatch, MemoRepository,
    Result,
};

const MEMO_COLUMNS: &str = "id, title, content, category, tags, summary, created_at, updated_at";

/// Row shape of the `memos` table.
#[derive(Debug, Clone, FromRow)]
pub struct MemoRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemoRow> for Memo {
    fn from(row: MemoRow) -> Self {
        Memo {
            id: row.id,
            title: row.title,
            content: row.content,
            category: MemoCategory::parse_lenient(&row.category),
            tags: row.tags,
            summary: normalize_summary(row.summary),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of MemoRepository.
#[derive(Clone)]
pub struct PgMemoRepository {
    pool: Pool<Postgres>,
}

impl PgMemoRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemoRepository for PgMemoRepository {
    async fn list(&self) -> Result<Vec<Memo>> {
        let query = format!(
            "SELECT {} FROM memos ORDER BY created_at DESC, id DESC",
            MEMO_COLUMNS
        );
        let rows = sqlx::query_as::<_, MemoRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "memos",
            op = "list",
            result_count = rows.len(),
            "Listed memos"
        );
        Ok(rows.into_iter().map(Memo::from).collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Memo>> {
        let query = format!("SELECT {} FROM memos WHERE id = $1", MEMO_COLUMNS);
        let row = sqlx::query_as::<_, MemoRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(Memo::from))
    }

    async fn insert(&self, req: CreateMemoRequest) -> Result<Memo> {
        let id = Uuid::now_v7();
        let updated_at = req.updated_at.max(req.created_at);
        let query = format!(
            "INSERT INTO memos ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            cols = MEMO_COLUMNS
        );

        let row = sqlx::query_as::<_, MemoRow>(&query)
            .bind(id)
            .bind(&req.title)
            .bind(&req.content)
            .bind(req.category.as_str())
            .bind(&req.tags)
            .bind(normalize_summary(req.summary))
            .bind(req.created_at)
            .bind(updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "memos",
            op = "insert",
            memo_id = %id,
            tag_count = req.tags.len(),
            "Inserted memo"
        );
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, patch: MemoPatch) -> Result<Memo> {
        let mut updates: Vec<String> = Vec::new();
        // $1 = id, dynamic params start at $2
        let mut param_idx = 2;

        if patch.title.is_some() {
            updates.push(format!("title = ${}", param_idx));
            param_idx += 1;
        }
        if patch.content.is_some() {
            updates.push(format!("content = ${}", param_idx));
            param_idx += 1;
        }
        if patch.category.is_some() {
            updates.push(format!("category = ${}", param_idx));
            param_idx += 1;
        }
        if patch.tags.is_some() {
            updates.push(format!("tags = ${}", param_idx));
            param_idx += 1;
        }
        if patch.summary.is_some() {
            updates.push(format!("summary = ${}", param_idx));
            param_idx += 1;
        }
        if patch.updated_at.is_some() {
            // Never move updated_at before created_at
            updates.push(format!("updated_at = GREATEST(${}, created_at)", param_idx));
        }

        if updates.is_empty() {
            return self.fetch(id).await?.ok_or(Error::MemoNotFound(id));
        }

        let query = format!(
            "UPDATE memos SET {} WHERE id = $1 RETURNING {}",
            updates.join(", "),
            MEMO_COLUMNS
        );

        let mut q = sqlx::query_as::<_, MemoRow>(&query).bind(id);
        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(content) = patch.content {
            q = q.bind(content);
        }
        if let Some(category) = patch.category {
            q = q.bind(category.as_str());
        }
        if let Some(tags) = patch.tags {
            q = q.bind(tags);
        }
        if let Some(summary) = patch.summary {
            q = q.bind(normalize_summary(summary));
        }
        if let Some(updated_at) = patch.updated_at {
            q = q.bind(updated_at);
        }

        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::MemoNotFound(id))?;

        debug!(
            subsystem = "database",
            component = "memos",
            op = "update",
            memo_id = %id,
            "Updated memo"
        );
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM memos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "memos",
            op = "delete",
            memo_id = %id,
            rows_affected = result.rows_affected(),
            "Deleted memo"
        );
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM memos")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "memos",
            op = "delete_all",
            rows_affected = result.rows_affected(),
            "Deleted all memos"
        );
        Ok(())
    }
}
