//! Test utilities for Storyloom
//!
//! This module provides common test utilities including temporary directory
//! management, test file creation, and a scripted in-memory provider.

use crate::config::Config;
use crate::error::{Result, StoryloomError};
use crate::providers::{CompletionRequest, CompletionResponse, GeneratedText, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration whose archive lives inside `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.archive.path = dir.path().join("past_chats.json");
    config
}

/// `count` copies of `word` separated by single spaces
pub fn words(count: usize, word: &str) -> String {
    vec![word; count].join(" ")
}

/// Provider that replays a fixed list of continuations
///
/// Each call returns the request prefix followed by the next scripted chunk.
/// Once the script is exhausted, or when built with [`ScriptedProvider::failing`],
/// calls fail with a provider error.
pub struct ScriptedProvider {
    chunks: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
    failure: Option<String>,
}

impl ScriptedProvider {
    /// Provider returning `chunks` in order
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks: Mutex::new(chunks.into()),
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Provider whose every call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            chunks: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(StoryloomError::Provider(message.clone()).into());
        }

        let chunk = self.chunks.lock().unwrap().pop_front().ok_or_else(|| {
            StoryloomError::Provider("Scripted provider ran out of chunks".to_string())
        })?;

        Ok(CompletionResponse::new(vec![
            GeneratedText::from_continuation(&request.prefix, &format!(" {}", chunk)),
        ]))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn get_current_model(&self) -> Result<String> {
        Ok("scripted-model".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(StoryloomError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_points_into_dir() {
        let dir = temp_dir();
        let config = test_config(&dir);
        assert!(config.archive.path.starts_with(dir.path()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_words() {
        assert_eq!(words(3, "a"), "a a a");
        assert_eq!(words(0, "a"), "");
    }

    #[tokio::test]
    async fn test_scripted_provider_replays_then_fails() {
        let provider = ScriptedProvider::new(vec!["next".to_string()]);
        let request = CompletionRequest::new("start", 10, 0);

        let response = provider.generate(&request).await.unwrap();
        assert_eq!(response.first_text(), Some("start next"));
        assert!(provider.generate(&request).await.is_err());
        assert_eq!(provider.call_count(), 2);
    }
}
