//! Core data models for memo-app.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// =============================================================================
// MEMO TYPES
// =============================================================================

/// Fixed set of memo categories.
///
/// Parsing is lenient: any unrecognized value becomes [`MemoCategory::Other`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MemoCategory {
    Personal,
    Work,
    Study,
    Idea,
    #[default]
    Other,
}

impl MemoCategory {
    /// All categories in display order.
    pub const ALL: [MemoCategory; 5] = [
        MemoCategory::Personal,
        MemoCategory::Work,
        MemoCategory::Study,
        MemoCategory::Idea,
        MemoCategory::Other,
    ];

    /// Stable lowercase name, also used as the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Study => "study",
            Self::Idea => "idea",
            Self::Other => "other",
        }
    }

    /// Parse a category name, falling back to `Other`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for MemoCategory {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "work" => Ok(Self::Work),
            "study" => Ok(Self::Study),
            "idea" => Ok(Self::Idea),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid memo category: {}", s)),
        }
    }
}

impl fmt::Display for MemoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MemoCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// One user note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: MemoCategory,
    pub tags: Vec<String>,
    /// Absent until a generation result has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-editable memo fields submitted on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoFormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: MemoCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request for inserting a new memo. Timestamps are supplied by the caller.
#[derive(Debug, Clone)]
pub struct CreateMemoRequest {
    pub title: String,
    pub content: String,
    pub category: MemoCategory,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreateMemoRequest {
    /// Build an insert request from form data, stamping both timestamps to `now`.
    pub fn from_form(form: MemoFormData, now: DateTime<Utc>) -> Self {
        Self {
            title: form.title,
            content: form.content,
            category: form.category,
            tags: form.tags,
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a memo. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<MemoCategory>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the stored summary.
    pub summary: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MemoPatch {
    /// Full user edit: replaces every form field and clears the stale summary.
    pub fn from_form(form: MemoFormData, now: DateTime<Utc>) -> Self {
        Self {
            title: Some(form.title),
            content: Some(form.content),
            category: Some(form.category),
            tags: Some(form.tags),
            summary: Some(None),
            updated_at: Some(now),
        }
    }

    /// Persist a generated summary, optionally with a tag list.
    pub fn generated(summary: String, tags: Option<Vec<String>>) -> Self {
        Self {
            tags,
            summary: Some(Some(summary)),
            ..Default::default()
        }
    }

    pub fn with_updated_at(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = Some(now);
        self
    }

    /// Apply this patch to an in-memory memo.
    pub fn apply_to(&self, memo: &mut Memo) {
        if let Some(title) = &self.title {
            memo.title = title.clone();
        }
        if let Some(content) = &self.content {
            memo.content = content.clone();
        }
        if let Some(category) = self.category {
            memo.category = category;
        }
        if let Some(tags) = &self.tags {
            memo.tags = tags.clone();
        }
        if let Some(summary) = &self.summary {
            memo.summary = normalize_summary(summary.clone());
        }
        if let Some(updated_at) = self.updated_at {
            memo.updated_at = updated_at.max(memo.created_at);
        }
    }
}

/// Collapse blank summaries to `None` so a present summary is never empty.
pub fn normalize_summary(summary: Option<String>) -> Option<String> {
    summary.filter(|s| !s.trim().is_empty())
}

// =============================================================================
// GENERATION TYPES
// =============================================================================

/// Result of combined summary and tag generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummaryAndTags {
    pub summary: String,
    pub tags: Vec<String>,
}

/// Sampling and output options for a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Request a typed output mode such as `application/json`.
    pub response_mime_type: Option<String>,
}

impl GenerationOptions {
    /// Options for summary-only generation.
    pub fn summary() -> Self {
        Self {
            max_output_tokens: crate::defaults::SUMMARY_MAX_OUTPUT_TOKENS,
            temperature: crate::defaults::GEN_TEMPERATURE,
            response_mime_type: None,
        }
    }

    /// Options for JSON summary and tag generation.
    pub fn summary_and_tags() -> Self {
        Self {
            max_output_tokens: crate::defaults::SUMMARY_TAGS_MAX_OUTPUT_TOKENS,
            temperature: crate::defaults::GEN_TEMPERATURE,
            response_mime_type: Some(crate::defaults::JSON_MIME_TYPE.to_string()),
        }
    }
}

// =============================================================================
// VIEW TYPES
// =============================================================================

/// Category selection for the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MemoCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: MemoCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(c) => c.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            return Ok(Self::All);
        }
        s.parse::<MemoCategory>().map(Self::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistics over the memo collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoStats {
    /// Number of memos in the collection.
    pub total: usize,
    /// Count per category, only categories that occur.
    pub by_category: BTreeMap<String, usize>,
    /// Number of memos in the current filtered view.
    pub filtered: usize,
}

/// Progress of the background tag enrichment for a memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Generation is in flight.
    Pending,
    /// Merged tags and summary were persisted.
    Completed { tags: Vec<String> },
    /// Generation or the persist step failed.
    Failed { error: String },
}
