//! Ollama provider implementation for Storyloom
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server and using its raw `/api/generate` endpoint for
//! plain text continuation.

use crate::config::OllamaConfig;
use crate::error::{Result, StoryloomError};
use crate::providers::{CompletionRequest, CompletionResponse, GeneratedText, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// Each requested candidate is one non-streaming `/api/generate` call in raw
/// mode, so the model continues the prefix verbatim instead of applying a
/// chat template.
///
/// # Examples
///
/// ```no_run
/// use storyloom::config::OllamaConfig;
/// use storyloom::providers::{CompletionRequest, OllamaProvider, Provider};
///
/// # async fn example() -> storyloom::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), None)?;
/// let response = provider
///     .generate(&CompletionRequest::new("The lighthouse keeper", 203, 50256))
///     .await?;
/// println!("{}", response.first_text().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request body for Ollama's /api/generate endpoint
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    raw: bool,
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options for /api/generate
#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: usize,
}

/// Response from Ollama's /api/generate endpoint
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host and model
    /// * `request_timeout` - Optional per-request timeout; `None` waits indefinitely
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::config::OllamaConfig;
    /// use storyloom::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), None);
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("storyloom/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoryloomError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, request: &CompletionRequest) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: self.config.model.clone(),
            prompt: request.prefix.clone(),
            raw: true,
            stream: false,
            options: OllamaOptions {
                num_predict: request.new_token_budget(),
            },
        }
    }

    async fn generate_once(
        &self,
        request: &CompletionRequest,
    ) -> Result<(GeneratedText, TokenUsage)> {
        let url = format!("{}/api/generate", self.config.host.trim_end_matches('/'));
        let body = self.build_request(request);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                StoryloomError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(StoryloomError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: OllamaGenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            StoryloomError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            parsed.done,
            parsed.prompt_eval_count,
            parsed.eval_count
        );

        Ok((
            GeneratedText::from_continuation(&request.prefix, &parsed.response),
            TokenUsage::new(parsed.prompt_eval_count, parsed.eval_count),
        ))
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        // Ollama stops on its own end-of-sequence token; the padding id has no
        // counterpart in its API.
        tracing::debug!(
            "Sending Ollama generate request: {} candidate(s), num_predict={}, pad_token_id={} (unused)",
            request.num_return_sequences,
            request.new_token_budget(),
            request.pad_token_id
        );

        let mut candidates = Vec::with_capacity(request.num_return_sequences);
        let mut usage = TokenUsage::default();
        for _ in 0..request.num_return_sequences.max(1) {
            let (candidate, candidate_usage) = self.generate_once(request).await?;
            candidates.push(candidate);
            usage.add(candidate_usage);
        }

        if usage.total_tokens > 0 {
            Ok(CompletionResponse::with_usage(candidates, usage))
        } else {
            Ok(CompletionResponse::new(candidates))
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
