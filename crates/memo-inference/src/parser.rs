//! Parser for the model's summary-and-tags output.
//!
//! The model is asked for a JSON object but is not guaranteed to produce one.
//! Parsing is a tagged two-path decode:
//!
//! 1. [`ParsedResponse::Strict`]: the text (minus any code fence) decodes as a
//!    JSON object with optional `summary` and `tags` fields.
//! 2. [`ParsedResponse::Extracted`]: otherwise, regular expressions recover a
//!    `summary: "..."` value and a `tags: [...]` list from the raw text.
//!
//! [`ParsedResponse::finalize`] then applies the fallback summary, the default
//! tag and the tag cap. Parsing never fails; it only degrades.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use memo_core::defaults::{DEFAULT_TAG, SUMMARY_FALLBACK};
use memo_core::{clamp_tags, SummaryAndTags};

static SUMMARY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)summary["\s]*:["\s]*"([^"]+)""#).expect("valid regex"));

static TAGS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)tags["\s]*:["\s]*\[([^\]]+)\]"#).expect("valid regex"));

#[derive(Debug, Deserialize)]
struct StrictPayload {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Outcome of decoding raw model output, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Strict JSON decode succeeded. Fields are exactly what the model sent.
    Strict {
        summary: Option<String>,
        tags: Option<Vec<String>>,
    },
    /// Heuristic extraction from non-JSON text.
    Extracted {
        summary: Option<String>,
        /// Cleaned but not yet capped.
        tags: Vec<String>,
        /// First line of the text, used when no summary was found.
        first_line: Option<String>,
    },
}

impl ParsedResponse {
    /// Decode raw model output. Empty output is treated as `{}`.
    pub fn parse(raw: &str) -> Self {
        let body = strip_code_fence(raw);
        let body = if body.trim().is_empty() { "{}" } else { body };

        match decode_strict(body) {
            Some(payload) => Self::Strict {
                summary: payload.summary,
                tags: payload.tags,
            },
            None => {
                warn!(
                    subsystem = "inference",
                    component = "parser",
                    parse_path = "extracted",
                    response_len = raw.len(),
                    "Failed to parse JSON response, attempting text extraction"
                );
                extract(body)
            }
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict { .. })
    }

    /// Apply the fallback summary, default tag and tag cap.
    pub fn finalize(self, max_tags: usize) -> SummaryAndTags {
        let (summary, tags) = match self {
            Self::Strict { summary, tags } => (
                non_blank(summary).unwrap_or_else(|| SUMMARY_FALLBACK.to_string()),
                tags.unwrap_or_default(),
            ),
            Self::Extracted {
                summary,
                tags,
                first_line,
            } => (
                non_blank(summary)
                    .or_else(|| non_blank(first_line))
                    .unwrap_or_else(|| SUMMARY_FALLBACK.to_string()),
                tags,
            ),
        };

        let tags = if tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            tags
        };

        SummaryAndTags {
            summary,
            tags: clamp_tags(tags, max_tags),
        }
    }
}

/// Parse and finalize in one step.
pub fn parse_summary_and_tags(raw: &str, max_tags: usize) -> SummaryAndTags {
    ParsedResponse::parse(raw).finalize(max_tags)
}

fn decode_strict(body: &str) -> Option<StrictPayload> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn extract(body: &str) -> ParsedResponse {
    let summary = SUMMARY_PATTERN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let tags = TAGS_PATTERN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| split_tag_list(m.as_str()))
        .unwrap_or_default();

    let first_line = body.lines().next().map(|l| l.trim().to_string());

    ParsedResponse::Extracted {
        summary,
        tags,
        first_line,
    }
}

fn split_tag_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|t| t.trim().replace(['"', '\''], "").trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Remove a surrounding Markdown code fence such as ```` ```json ... ``` ````.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return raw;
    };
    // Drop the info string ("json") on the opening line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest)
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
