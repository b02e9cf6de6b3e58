//! Story extension loop
//!
//! Grows a prompt into a story by repeatedly asking the provider to continue
//! the text so far. The loop stops when the story reaches the target word
//! count, or right after appending a chunk that is too short to be useful
//! (which usually means the model has run dry or started repeating itself).

use crate::config::StoryConfig;
use crate::error::{Result, StoryloomError};
use crate::providers::{word_count, CompletionRequest, Provider, TokenUsage};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Why an extension run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The story reached the target word count
    TargetReached,
    /// The last chunk had fewer words than `min_chunk_words`
    ShortChunk,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetReached => write!(f, "target reached"),
            Self::ShortChunk => write!(f, "short chunk"),
        }
    }
}

/// Result of an extension run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// The prompt followed by every appended chunk
    pub story: String,
    /// Number of chunks appended
    pub chunks: usize,
    /// Why the loop ended
    pub stop_reason: StopReason,
    /// Tokens reported by the provider across all calls
    pub usage: TokenUsage,
}

impl Extension {
    /// Word count of the final story
    pub fn word_count(&self) -> usize {
        word_count(&self.story)
    }
}

/// Grows prompts into stories using a shared provider handle
///
/// # Examples
///
/// ```no_run
/// use storyloom::config::Config;
/// use storyloom::providers::create_provider;
/// use storyloom::story::StoryExtender;
///
/// # async fn example() -> storyloom::error::Result<()> {
/// let config = Config::default();
/// let provider = create_provider("ollama", &config.provider)?;
/// let extender = StoryExtender::new(provider, config.story.clone());
/// let story = extender.extend("A dragon wakes up.", 300).await?;
/// println!("{}", story);
/// # Ok(())
/// # }
/// ```
pub struct StoryExtender {
    provider: Arc<dyn Provider>,
    config: StoryConfig,
}

impl StoryExtender {
    /// Creates a new extender around an already-initialized provider
    pub fn new(provider: Arc<dyn Provider>, config: StoryConfig) -> Self {
        Self { provider, config }
    }

    /// Grow `prompt` into a story of about `target_word_count` words
    ///
    /// The returned story always starts with `prompt` unchanged. If the prompt
    /// already has `target_word_count` words or more, no provider call is made.
    ///
    /// # Errors
    ///
    /// - `StoryloomError::EmptyPrompt` if `prompt` is blank
    /// - any provider failure, unchanged; nothing is retried
    pub async fn extend(&self, prompt: &str, target_word_count: usize) -> Result<String> {
        Ok(self
            .extend_with_report(prompt, target_word_count)
            .await?
            .story)
    }

    /// Like [`extend`](Self::extend), also reporting chunk count and stop reason
    pub async fn extend_with_report(
        &self,
        prompt: &str,
        target_word_count: usize,
    ) -> Result<Extension> {
        if prompt.trim().is_empty() {
            return Err(StoryloomError::EmptyPrompt.into());
        }

        info!(
            provider = self.provider.name(),
            target_word_count, "Starting story extension"
        );

        let mut story = prompt.to_string();
        let mut current = word_count(&story);
        let mut chunks = 0;
        let mut usage = TokenUsage::default();
        // An empty chunk must always end the loop
        let min_chunk_words = self.config.min_chunk_words.max(1);

        let stop_reason = loop {
            if current >= target_word_count {
                break StopReason::TargetReached;
            }

            let request = CompletionRequest::new(
                story.clone(),
                current + self.config.chunk_budget,
                self.config.pad_token_id,
            );
            let response = self.provider.generate(&request).await?;
            if let Some(reported) = response.usage {
                usage.add(reported);
            }
            let full_text = response.first_text().ok_or_else(|| {
                StoryloomError::Provider("Provider returned no candidates".to_string())
            })?;

            let chunk = continuation(full_text, &story);
            let chunk_words = word_count(&chunk);

            story.push(' ');
            story.push_str(&chunk);
            current = word_count(&story);
            chunks += 1;

            debug!(
                chunk = chunks,
                chunk_words,
                story_words = current,
                target_word_count,
                "Appended chunk"
            );

            if chunk_words < min_chunk_words {
                break StopReason::ShortChunk;
            }
        };

        info!(
            chunks,
            story_words = current,
            stop_reason = %stop_reason,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Story extension finished"
        );

        Ok(Extension {
            story,
            chunks,
            stop_reason,
            usage,
        })
    }
}

/// The trimmed part of `full_text` beyond the first `prefix.chars().count()`
/// characters
fn continuation(full_text: &str, prefix: &str) -> String {
    full_text
        .chars()
        .skip(prefix.chars().count())
        .collect::<String>()
        .trim()
        .to_string()
}
