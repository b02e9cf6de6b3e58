//! Hugging Face text-generation provider
//!
//! Talks to the Hugging Face inference API, or any server speaking the same
//! `text-generation` task protocol, and returns full-text candidates.

use crate::config::HuggingFaceConfig;
use crate::error::{Result, StoryloomError};
use crate::providers::{CompletionRequest, CompletionResponse, GeneratedText, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hugging Face inference provider
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

/// Request body for the text-generation task
#[derive(Debug, Serialize)]
struct TextGenerationRequest {
    inputs: String,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    max_new_tokens: usize,
    num_return_sequences: usize,
    pad_token_id: u32,
    return_full_text: bool,
}

/// One element of the text-generation response array
#[derive(Debug, Deserialize)]
struct TextGenerationOutput {
    generated_text: String,
}

/// Error body returned by the inference API
#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

impl HuggingFaceProvider {
    /// Create a new Hugging Face provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - API base, model id and optional token
    /// * `request_timeout` - Optional per-request timeout; `None` waits indefinitely
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::config::HuggingFaceConfig;
    /// use storyloom::providers::HuggingFaceProvider;
    ///
    /// let provider = HuggingFaceProvider::new(HuggingFaceConfig::default(), None).unwrap();
    /// assert!(provider.endpoint().ends_with("/models/EleutherAI/gpt-j-6B"));
    /// ```
    pub fn new(config: HuggingFaceConfig, request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("storyloom/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoryloomError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_token.is_none() {
            tracing::warn!("No Hugging Face API token configured; requests may be rate limited");
        }

        tracing::info!(
            "Initialized Hugging Face provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, request: &CompletionRequest) -> TextGenerationRequest {
        TextGenerationRequest {
            inputs: request.prefix.clone(),
            parameters: TextGenerationParameters {
                max_new_tokens: request.new_token_budget(),
                num_return_sequences: request.num_return_sequences,
                pad_token_id: request.pad_token_id,
                return_full_text: true,
            },
        }
    }
}

#[async_trait]
impl Provider for HuggingFaceProvider {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = self.endpoint();
        let body = self.build_request(request);

        tracing::debug!(
            "Sending Hugging Face request to {}: max_new_tokens={}, candidates={}",
            url,
            body.parameters.max_new_tokens,
            body.parameters.num_return_sequences
        );

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(token) = &self.config.api_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await.map_err(|e| {
            tracing::error!("Hugging Face request failed: {}", e);
            StoryloomError::Provider(format!("Hugging Face request failed: {}", e))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            StoryloomError::Provider(format!("Failed to read Hugging Face response: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            tracing::error!("Hugging Face returned error {}: {}", status, message);
            return Err(StoryloomError::Provider(format!(
                "Hugging Face returned error {}: {}",
                status, message
            ))
            .into());
        }

        let outputs: Vec<TextGenerationOutput> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse Hugging Face response: {}", e);
            StoryloomError::Provider(format!("Failed to parse Hugging Face response: {}", e))
        })?;

        let candidates = outputs
            .into_iter()
            .map(|o| GeneratedText::with_prefix(&request.prefix, o.generated_text))
            .collect();

        Ok(CompletionResponse::new(candidates))
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
