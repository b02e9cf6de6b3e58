//! User-facing generation request

use crate::config::StoryConfig;
use crate::error::{Result, StoryloomError};

/// A validated request to grow `prompt` into a story of about
/// `target_word_count` words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Story idea; used verbatim as the opening of the story
    pub prompt: String,
    /// Desired story length in whitespace-separated words
    pub target_word_count: usize,
}

impl GenerationRequest {
    /// Build a request, enforcing a non-blank prompt and the configured range
    ///
    /// # Errors
    ///
    /// - `StoryloomError::EmptyPrompt` if `prompt` is blank
    /// - `StoryloomError::LengthOutOfRange` if the target is outside
    ///   `[min_words, max_words]`
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::config::StoryConfig;
    /// use storyloom::story::GenerationRequest;
    ///
    /// let config = StoryConfig::default();
    /// let request = GenerationRequest::new("A dragon wakes up.", 1000, &config).unwrap();
    /// assert_eq!(request.target_word_count, 1000);
    /// assert!(GenerationRequest::new("   ", 1000, &config).is_err());
    /// assert!(GenerationRequest::new("A dragon", 5000, &config).is_err());
    /// ```
    pub fn new(
        prompt: impl Into<String>,
        target_word_count: usize,
        config: &StoryConfig,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StoryloomError::EmptyPrompt.into());
        }
        validate_length(target_word_count, config)?;

        Ok(Self {
            prompt,
            target_word_count,
        })
    }
}

/// Check a target length against the configured range
pub fn validate_length(target_word_count: usize, config: &StoryConfig) -> Result<()> {
    if target_word_count < config.min_words || target_word_count > config.max_words {
        return Err(StoryloomError::LengthOutOfRange {
            value: target_word_count,
            min: config.min_words,
            max: config.max_words,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let config = StoryConfig::default();
        assert!(GenerationRequest::new("x", 100, &config).is_ok());
        assert!(GenerationRequest::new("x", 1500, &config).is_ok());
        assert!(GenerationRequest::new("x", 99, &config).is_err());
        assert!(GenerationRequest::new("x", 1501, &config).is_err());
    }

    #[test]
    fn test_prompt_kept_verbatim() {
        let config = StoryConfig::default();
        let request = GenerationRequest::new("  Once upon a time\n", 200, &config).unwrap();
        assert_eq!(request.prompt, "  Once upon a time\n");
    }

    #[test]
    fn test_error_kinds() {
        let config = StoryConfig::default();
        let err = GenerationRequest::new("", 200, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoryloomError>(),
            Some(StoryloomError::EmptyPrompt)
        ));

        let err = GenerationRequest::new("x", 10, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoryloomError>(),
            Some(StoryloomError::LengthOutOfRange { value: 10, .. })
        ));
    }
}
