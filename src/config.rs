//! Configuration management for Storyloom
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, StoryloomError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provider types accepted in `provider.type`
pub const VALID_PROVIDERS: [&str; 2] = ["ollama", "huggingface"];

/// Main configuration structure for Storyloom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Text-generation provider configuration
    pub provider: ProviderConfig,
    /// Story extension behavior
    #[serde(default)]
    pub story: StoryConfig,
    /// Story archive location
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Provider configuration
///
/// Specifies which text-generation backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Optional HTTP request timeout in seconds
    ///
    /// Absent means generation calls may block indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Hugging Face inference configuration
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Hugging Face text-generation inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    /// Base URL of the inference API (or a self-hosted compatible server)
    #[serde(default = "default_hf_api_base")]
    pub api_base: String,

    /// Model repository identifier
    #[serde(default = "default_hf_model")]
    pub model: String,

    /// Optional bearer token
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_hf_api_base() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_hf_model() -> String {
    "EleutherAI/gpt-j-6B".to_string()
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_base: default_hf_api_base(),
            model: default_hf_model(),
            api_token: None,
        }
    }
}

/// Story extension configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Smallest selectable target length in words
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Largest selectable target length in words
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Target length used until the user picks another
    #[serde(default = "default_words")]
    pub default_words: usize,

    /// Tokens requested beyond the current story length on each call
    #[serde(default = "default_chunk_budget")]
    pub chunk_budget: usize,

    /// Chunks shorter than this many words end the extension
    #[serde(default = "default_min_chunk_words")]
    pub min_chunk_words: usize,

    /// End-of-sequence token id passed as the padding token
    #[serde(default = "default_pad_token_id")]
    pub pad_token_id: u32,
}

fn default_min_words() -> usize {
    100
}

fn default_max_words() -> usize {
    1500
}

fn default_words() -> usize {
    1000
}

fn default_chunk_budget() -> usize {
    200
}

fn default_min_chunk_words() -> usize {
    10
}

fn default_pad_token_id() -> u32 {
    50256
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_words: default_max_words(),
            default_words: default_words(),
            chunk_budget: default_chunk_budget(),
            min_chunk_words: default_min_chunk_words(),
            pad_token_id: default_pad_token_id(),
        }
    }
}

/// Archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Path of the JSON file holding past stories
    #[serde(default = "default_archive_path")]
    pub path: PathBuf,
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("past_chats.json")
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: default_archive_path(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "ollama".to_string(),
                request_timeout_seconds: None,
                ollama: OllamaConfig::default(),
                huggingface: HuggingFaceConfig::default(),
            },
            story: StoryConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StoryloomError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| StoryloomError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("STORYLOOM_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(timeout) = std::env::var("STORYLOOM_REQUEST_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.provider.request_timeout_seconds = Some(v),
                Err(_) => {
                    tracing::warn!("Invalid STORYLOOM_REQUEST_TIMEOUT_SECONDS: {}", timeout)
                }
            }
        }

        if let Ok(ollama_host) = std::env::var("STORYLOOM_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("STORYLOOM_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(api_base) = std::env::var("STORYLOOM_HF_API_BASE") {
            self.provider.huggingface.api_base = api_base;
        }

        if let Ok(hf_model) = std::env::var("STORYLOOM_HF_MODEL") {
            self.provider.huggingface.model = hf_model;
        }

        if let Ok(token) =
            std::env::var("STORYLOOM_HF_TOKEN").or_else(|_| std::env::var("HF_API_TOKEN"))
        {
            self.provider.huggingface.api_token = Some(token);
        }

        if let Ok(archive_path) = std::env::var("STORYLOOM_ARCHIVE_PATH") {
            tracing::debug!(archive_path = %archive_path, "Env override: STORYLOOM_ARCHIVE_PATH");
            self.archive.path = PathBuf::from(archive_path);
        }

        if let Ok(words) = std::env::var("STORYLOOM_DEFAULT_WORDS") {
            if let Ok(value) = words.parse() {
                self.story.default_words = value;
            } else {
                tracing::warn!("Invalid STORYLOOM_DEFAULT_WORDS: {}", words);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(provider) = &cli.provider {
            self.provider.provider_type = provider.clone();
        }

        if let Some(archive) = &cli.archive {
            self.archive.path = archive.clone();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(StoryloomError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(StoryloomError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.provider.request_timeout_seconds == Some(0) {
            return Err(StoryloomError::Config(
                "provider.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        validate_url("provider.ollama.host", &self.provider.ollama.host)?;
        validate_url(
            "provider.huggingface.api_base",
            &self.provider.huggingface.api_base,
        )?;

        let story = &self.story;
        if story.min_words == 0 {
            return Err(
                StoryloomError::Config("story.min_words must be greater than 0".to_string()).into(),
            );
        }

        if story.min_words > story.max_words {
            return Err(StoryloomError::Config(format!(
                "story.min_words ({}) must not exceed story.max_words ({})",
                story.min_words, story.max_words
            ))
            .into());
        }

        if story.default_words < story.min_words || story.default_words > story.max_words {
            return Err(StoryloomError::Config(format!(
                "story.default_words ({}) must be between {} and {}",
                story.default_words, story.min_words, story.max_words
            ))
            .into());
        }

        if story.chunk_budget == 0 {
            return Err(StoryloomError::Config(
                "story.chunk_budget must be greater than 0".to_string(),
            )
            .into());
        }

        if story.min_chunk_words == 0 {
            return Err(StoryloomError::Config(
                "story.min_chunk_words must be greater than 0".to_string(),
            )
            .into());
        }

        if self.archive.path.as_os_str().is_empty() {
            return Err(StoryloomError::Config("archive.path cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| StoryloomError::Config(format!("{} is not a valid URL: {}", field, e)).into())
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serial_test::serial;

    const ENV_VARS: [&str; 10] = [
        "STORYLOOM_PROVIDER",
        "STORYLOOM_REQUEST_TIMEOUT_SECONDS",
        "STORYLOOM_OLLAMA_HOST",
        "STORYLOOM_OLLAMA_MODEL",
        "STORYLOOM_HF_API_BASE",
        "STORYLOOM_HF_MODEL",
        "STORYLOOM_HF_TOKEN",
        "HF_API_TOKEN",
        "STORYLOOM_ARCHIVE_PATH",
        "STORYLOOM_DEFAULT_WORDS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.provider.request_timeout_seconds, None);
        assert_eq!(config.story.min_words, 100);
        assert_eq!(config.story.max_words, 1500);
        assert_eq!(config.story.default_words, 1000);
        assert_eq!(config.story.chunk_budget, 200);
        assert_eq!(config.story.min_chunk_words, 10);
        assert_eq!(config.story.pad_token_id, 50256);
        assert_eq!(config.archive.path, PathBuf::from("past_chats.json"));
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "openai".to_string();
        assert!(config.validate().is_err());

        config.provider.provider_type = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.provider.request_timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        config.provider.request_timeout_seconds = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_host() {
        let mut config = Config::default();
        config.provider.ollama.host = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_word_range() {
        let mut config = Config::default();
        config.story.min_words = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.story.min_words = 2000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.story.default_words = 50;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.story.default_words = 1501;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_chunk_budget() {
        let mut config = Config::default();
        config.story.chunk_budget = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_min_chunk_words() {
        let mut config = Config::default();
        config.story.min_chunk_words = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_chunk_words"));
    }

    #[test]
    fn test_config_validation_empty_archive_path() {
        let mut config = Config::default();
        config.archive.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  type: huggingface
  request_timeout_seconds: 90
  huggingface:
    api_base: http://localhost:8080
    model: EleutherAI/gpt-neo-125m
story:
  min_words: 50
  max_words: 800
  default_words: 400
archive:
  path: stories/archive.json
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.provider_type, "huggingface");
        assert_eq!(config.provider.request_timeout_seconds, Some(90));
        assert_eq!(config.provider.huggingface.model, "EleutherAI/gpt-neo-125m");
        assert_eq!(config.provider.huggingface.api_token, None);
        assert_eq!(config.provider.ollama.host, "http://localhost:11434");
        assert_eq!(config.story.default_words, 400);
        assert_eq!(config.story.chunk_budget, 200);
        assert_eq!(config.archive.path, PathBuf::from("stories/archive.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml_minimal() {
        let config: Config = serde_yaml::from_str("provider:\n  type: ollama\n").unwrap();
        assert_eq!(config.story.default_words, 1000);
        assert_eq!(config.archive.path, PathBuf::from("past_chats.json"));
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let cli = Cli::try_parse_from(["storyloom", "history", "list"]).unwrap();
        let config = Config::load("/nonexistent/storyloom.yaml", &cli).unwrap();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.story.default_words, 1000);
    }

    #[test]
    #[serial]
    fn test_load_rejects_malformed_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "provider: [unclosed").unwrap();

        let cli = Cli::try_parse_from(["storyloom", "history", "list"]).unwrap();
        let result = Config::load(path.to_str().unwrap(), &cli);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        clear_env();
        std::env::set_var("STORYLOOM_PROVIDER", "huggingface");
        std::env::set_var("STORYLOOM_HF_MODEL", "gpt2");
        std::env::set_var("HF_API_TOKEN", "hf_secret");
        std::env::set_var("STORYLOOM_ARCHIVE_PATH", "/tmp/stories.json");
        std::env::set_var("STORYLOOM_DEFAULT_WORDS", "250");
        std::env::set_var("STORYLOOM_REQUEST_TIMEOUT_SECONDS", "not-a-number");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.provider.provider_type, "huggingface");
        assert_eq!(config.provider.huggingface.model, "gpt2");
        assert_eq!(
            config.provider.huggingface.api_token,
            Some("hf_secret".to_string())
        );
        assert_eq!(config.archive.path, PathBuf::from("/tmp/stories.json"));
        assert_eq!(config.story.default_words, 250);
        assert_eq!(config.provider.request_timeout_seconds, None);
    }

    #[test]
    #[serial]
    fn test_storyloom_token_takes_precedence() {
        clear_env();
        std::env::set_var("STORYLOOM_HF_TOKEN", "primary");
        std::env::set_var("HF_API_TOKEN", "fallback");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(
            config.provider.huggingface.api_token,
            Some("primary".to_string())
        );
    }

    #[test]
    #[serial]
    fn test_cli_overrides_win_over_env() {
        clear_env();
        std::env::set_var("STORYLOOM_ARCHIVE_PATH", "/tmp/from-env.json");

        let cli = Cli::try_parse_from([
            "storyloom",
            "--archive",
            "/tmp/from-cli.json",
            "--provider",
            "huggingface",
            "history",
            "list",
        ])
        .unwrap();
        let config = Config::load("/nonexistent/storyloom.yaml", &cli).unwrap();
        clear_env();

        assert_eq!(config.archive.path, PathBuf::from("/tmp/from-cli.json"));
        assert_eq!(config.provider.provider_type, "huggingface");
    }
}
