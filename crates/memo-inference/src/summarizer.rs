//! Summary and tag generation client.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use memo_core::defaults::{
    MAX_GENERATED_TAGS, SUMMARY_ERROR_MESSAGE, SUMMARY_FALLBACK, SUMMARY_TAGS_ERROR_MESSAGE,
};
use memo_core::{Error, GenerationBackend, GenerationOptions, Result, SummaryAndTags};

use crate::parser::ParsedResponse;
use crate::prompts;

/// Builds prompts, calls the generation backend and normalizes the result.
///
/// Transport and service failures are logged with their cause and surfaced
/// as [`Error::Generation`] carrying a generic user-facing message.
#[derive(Clone)]
pub struct Summarizer {
    backend: Arc<dyn GenerationBackend>,
    max_tags: usize,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            max_tags: MAX_GENERATED_TAGS,
        }
    }

    /// Override the cap applied to generated tag lists.
    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    pub fn max_tags(&self) -> usize {
        self.max_tags
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Summarize memo content. Never returns empty text on success.
    pub async fn generate_summary(&self, content: &str) -> Result<String> {
        let start = Instant::now();
        let prompt = prompts::summary_prompt(content);

        let text = self
            .backend
            .generate(&prompt, &GenerationOptions::summary())
            .await
            .map_err(|e| {
                error!(
                    subsystem = "inference",
                    op = "generate_summary",
                    model = %self.backend.model_name(),
                    error = %e,
                    "Error generating summary"
                );
                Error::Generation(SUMMARY_ERROR_MESSAGE.to_string())
            })?;

        debug!(
            subsystem = "inference",
            op = "generate_summary",
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary generated"
        );

        if text.trim().is_empty() {
            Ok(SUMMARY_FALLBACK.to_string())
        } else {
            Ok(text)
        }
    }

    /// Summarize memo content and suggest tags.
    pub async fn generate_summary_and_tags(&self, content: &str) -> Result<SummaryAndTags> {
        let start = Instant::now();
        let prompt = prompts::summary_and_tags_prompt(content);

        let raw = self
            .backend
            .generate(&prompt, &GenerationOptions::summary_and_tags())
            .await
            .map_err(|e| {
                error!(
                    subsystem = "inference",
                    op = "generate_summary_and_tags",
                    model = %self.backend.model_name(),
                    error = %e,
                    "Error generating summary and tags"
                );
                Error::Generation(SUMMARY_TAGS_ERROR_MESSAGE.to_string())
            })?;

        let parsed = ParsedResponse::parse(&raw);
        let parse_path = if parsed.is_strict() { "strict" } else { "extracted" };
        let result = parsed.finalize(self.max_tags);

        debug!(
            subsystem = "inference",
            op = "generate_summary_and_tags",
            parse_path,
            tag_count = result.tags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary and tags generated"
        );

        Ok(result)
    }
}
