//! Storyloom - long-form story generator library
//!
//! This library grows short story ideas into long-form stories by repeatedly
//! asking a text-generation model to continue the text, and keeps every
//! generated story in a JSON archive.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `providers`: Text-generation provider abstraction and implementations (Ollama, Hugging Face)
//! - `story`: Generation requests and the chunked extension loop
//! - `storage`: The JSON story archive
//! - `session`: Interactive session state machine
//! - `render`: Terminal rendering of stories and the archive
//! - `commands`: Handlers for the `shell`, `generate` and `history` commands
//! - `config`: Configuration management and validation
//! - `logging`: Tracing subscriber setup
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use storyloom::providers::create_provider;
//! use storyloom::{ChatArchive, Config, StoryExtender};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//!     let extender = StoryExtender::new(provider, config.story.clone());
//!     let story = extender.extend("A dragon wakes up.", 300).await?;
//!
//!     ChatArchive::new(&config.archive.path).append("A dragon wakes up.", &story)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod render;
pub mod session;
pub mod storage;
pub mod story;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StoryloomError};
pub use session::{SessionEvent, SessionState, StorySession};
pub use storage::{ChatArchive, StoryRecord};
pub use story::{GenerationRequest, StoryExtender};

#[cfg(test)]
pub mod test_utils;
