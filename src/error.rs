//! Error types for Storyloom
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Storyloom operations
///
/// Covers configuration loading, calls into the text-generation provider,
/// archive reads and writes, and the interactive session state machine.
#[derive(Error, Debug)]
pub enum StoryloomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (transport, status codes, malformed responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// No story idea was supplied
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    /// Requested story length lies outside the configured range
    #[error("Story length {value} is out of range: must be between {min} and {max} words")]
    LengthOutOfRange {
        /// The requested word count
        value: usize,
        /// Smallest accepted word count
        min: usize,
        /// Largest accepted word count
        max: usize,
    },

    /// The archive file exists but does not hold a valid record sequence
    #[error("Archive parse error: {0}")]
    ArchiveParse(String),

    /// Archive read/write errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// No archived story carries the requested number
    #[error("Story {number} not found: the archive holds {total} stories")]
    StoryNotFound {
        /// Requested story number
        number: usize,
        /// Number of stories in the archive
        total: usize,
    },

    /// The session was asked to make a transition its current state forbids
    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Storyloom operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
