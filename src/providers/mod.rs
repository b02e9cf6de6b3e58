//! Provider module for Storyloom
//!
//! This module contains the text-generation provider abstraction and the
//! Ollama and Hugging Face implementations.

pub mod base;
pub mod huggingface;
pub mod ollama;

pub use base::{
    word_count, CompletionRequest, CompletionResponse, GeneratedText, Provider, TokenUsage,
};
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, StoryloomError};
use std::sync::Arc;
use std::time::Duration;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("ollama" or "huggingface")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared provider handle, meant to be created once per process
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use storyloom::config::Config;
/// use storyloom::providers::create_provider;
///
/// let config = Config::default();
/// let provider = create_provider("ollama", &config.provider).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    let timeout = config.request_timeout_seconds.map(Duration::from_secs);

    match provider_type {
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone(), timeout)?)),
        "huggingface" => Ok(Arc::new(HuggingFaceProvider::new(
            config.huggingface.clone(),
            timeout,
        )?)),
        _ => Err(StoryloomError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}
