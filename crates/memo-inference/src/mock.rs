//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use memo_inference::mock::{MockGenerationBackend, MockReply};
//!
//! let backend = MockGenerationBackend::new()
//!     .with_response(r#"{"summary": "S", "tags": ["x"]}"#)
//!     .with_reply_for("slow memo", MockReply::text("late").delayed_ms(200))
//!     .with_reply_for("broken memo", MockReply::failure("HTTP 503"));
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use memo_core::{Error, GenerationBackend, GenerationOptions, Result};

/// A scripted answer.
#[derive(Debug, Clone)]
pub struct MockReply {
    outcome: std::result::Result<String, String>,
    delay: Duration,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: Duration::ZERO,
        }
    }

    /// Fail the call with [`Error::Request`] carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    default_reply: MockReply,
    /// Replies chosen when the prompt contains the needle. First match wins.
    mapped: Vec<(String, MockReply)>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-gemini".to_string(),
            default_reply: MockReply::text(r#"{"summary": "Mock summary", "tags": ["mock"]}"#),
            mapped: Vec::new(),
        }
    }
}

/// Mock generation backend. Clones share the call log.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply for prompts without a mapping.
    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_reply = MockReply::text(text);
        self
    }

    /// Make every unmapped call fail.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_reply = MockReply::failure(message);
        self
    }

    /// Use `reply` whenever the prompt contains `needle`.
    pub fn with_reply_for(mut self, needle: impl Into<String>, reply: MockReply) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped
            .push((needle.into(), reply));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<MockCall>> {
        self.call_log.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        self.config
            .mapped
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.config.default_reply.clone())
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.log().push(MockCall {
            prompt: prompt.to_string(),
            options: options.clone(),
        });

        let reply = self.reply_for(prompt);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome.map_err(Error::Request)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
