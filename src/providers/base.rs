//! Base provider trait and common types for Storyloom
//!
//! This module defines the Provider trait that every text-generation backend
//! implements, along with the request and response types exchanged with it.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Number of whitespace-separated words in `text`
///
/// This is the unit used for prefix lengths and story lengths throughout
/// the crate.
///
/// # Examples
///
/// ```
/// use storyloom::providers::word_count;
///
/// assert_eq!(word_count("  A dragon\nwakes  up. "), 4);
/// assert_eq!(word_count(""), 0);
/// ```
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A single text-completion request
///
/// `max_length` bounds the total output (prefix plus continuation), measured
/// in the same word units as [`word_count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Text the model continues from
    pub prefix: String,
    /// Maximum total length of prefix plus continuation
    pub max_length: usize,
    /// Number of candidate continuations requested
    pub num_return_sequences: usize,
    /// End-of-sequence token id used for padding
    pub pad_token_id: u32,
}

impl CompletionRequest {
    /// Create a single-candidate request
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::providers::CompletionRequest;
    ///
    /// let request = CompletionRequest::new("Once upon a time", 204, 50256);
    /// assert_eq!(request.num_return_sequences, 1);
    /// assert_eq!(request.new_token_budget(), 200);
    /// ```
    pub fn new(prefix: impl Into<String>, max_length: usize, pad_token_id: u32) -> Self {
        Self {
            prefix: prefix.into(),
            max_length,
            num_return_sequences: 1,
            pad_token_id,
        }
    }

    /// Tokens the model may add beyond the prefix
    pub fn new_token_budget(&self) -> usize {
        self.max_length.saturating_sub(word_count(&self.prefix))
    }
}

/// One candidate returned by a provider
///
/// `generated_text` always holds the full text: the request prefix followed
/// by the continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    /// Prefix plus continuation
    pub generated_text: String,
}

impl GeneratedText {
    /// Join a prefix and a bare continuation into a full-text candidate
    pub fn from_continuation(prefix: &str, continuation: &str) -> Self {
        Self {
            generated_text: format!("{}{}", prefix, continuation),
        }
    }

    /// Ensure the candidate starts with `prefix`, prepending it when missing
    pub fn with_prefix(prefix: &str, text: String) -> Self {
        if text.starts_with(prefix) {
            Self {
                generated_text: text,
            }
        } else {
            Self::from_continuation(prefix, &text)
        }
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Accumulate another usage report into this one
    pub fn add(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Response from a completion call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Candidate texts in provider order
    pub candidates: Vec<GeneratedText>,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a response without usage information
    pub fn new(candidates: Vec<GeneratedText>) -> Self {
        Self {
            candidates,
            usage: None,
        }
    }

    /// Create a response with usage information
    pub fn with_usage(candidates: Vec<GeneratedText>, usage: TokenUsage) -> Self {
        Self {
            candidates,
            usage: Some(usage),
        }
    }

    /// The first candidate's full text, if any
    pub fn first_text(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.generated_text.as_str())
    }
}

/// Provider trait for text-generation backends
///
/// A provider is constructed once per process and shared behind an `Arc`.
/// Implementations must not retry; failures propagate to the caller.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Continue `request.prefix`
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or the response cannot be decoded
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider identifier ("ollama", "huggingface", ...)
    fn name(&self) -> &str;

    /// Get the name of the model requests are sent to
    ///
    /// # Default Implementation
    ///
    /// The default implementation returns an error.
    fn get_current_model(&self) -> Result<String> {
        Err(crate::error::StoryloomError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }
}
