//! Gemini backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use memo_core::defaults::{GEMINI_BASE_URL, GEN_MODEL, GEN_TIMEOUT_SECS};
use memo_core::{Error, GenerationBackend, GenerationOptions, Result};

use super::error::{to_memo_error, GeminiErrorCode};
use super::types::*;

/// Configuration for the Gemini backend.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version segment.
    pub base_url: String,
    pub api_key: String,
    /// Model used for every generation call.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl GeminiConfig {
    /// Defaults for everything except the credential.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: GEN_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables.
    ///
    /// `GEMINI_API_KEY` is required. `GEMINI_BASE_URL`, `GEMINI_MODEL` and
    /// `GEMINI_TIMEOUT` are optional.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("GEMINI_API_KEY environment variable is not set".to_string())
            })?;

        let mut config = Self::with_api_key(api_key);
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(raw) = std::env::var("GEMINI_TIMEOUT") {
            config.timeout_seconds = raw
                .parse()
                .map_err(|_| Error::Config(format!("GEMINI_TIMEOUT must be seconds: {}", raw)))?;
        }
        Ok(config)
    }
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            model = %config.model,
            base_url = %config.base_url,
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.config.model,
            prompt_len = prompt.len(),
            max_output_tokens = options.max_output_tokens,
            "Generating content"
        );

        let request = GenerateContentRequest::from_prompt(
            prompt,
            GenerationConfig {
                max_output_tokens: options.max_output_tokens,
                temperature: options.temperature,
                response_mime_type: options.response_mime_type.clone(),
            },
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let (message, error_status) = match response.json::<GeminiErrorResponse>().await {
                Ok(body) => (body.error.message, body.error.status),
                Err(_) => ("Unknown error".to_string(), String::new()),
            };
            let code = GeminiErrorCode::from_response(status.as_u16(), &error_status);
            return Err(to_memo_error(
                code,
                &format!("Gemini returned {}: {}", status, message),
            ));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse response: {}", e)))?;

        let text = result.text();
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
