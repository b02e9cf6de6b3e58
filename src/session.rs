//! Interactive session state
//!
//! A story session holds the user's controls (prompt text and target length)
//! and moves through three states:
//!
//! - `Idle`: waiting for the user
//! - `Generating`: an extension run is in flight
//! - `Displaying`: a finished story is on screen, saved or about to be saved
//!
//! Transitions are explicit events; anything else is rejected.

use crate::config::StoryConfig;
use crate::error::{Result, StoryloomError};
use crate::providers::word_count;
use crate::storage::{ChatArchive, StoryRecord};
use crate::story::{validate_length, Extension, GenerationRequest, StoryExtender};
use std::fmt;

/// Current state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for input
    Idle,
    /// Extension in progress
    Generating {
        /// The request being served
        request: GenerationRequest,
    },
    /// A generated story is being shown
    Displaying {
        /// Prompt the story grew from
        prompt: String,
        /// Generated story
        story: String,
        /// Whether the story has been written to the archive
        saved: bool,
    },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Generating { .. } => write!(f, "Generating"),
            Self::Displaying { saved: false, .. } => write!(f, "Displaying (unsaved)"),
            Self::Displaying { saved: true, .. } => write!(f, "Displaying"),
        }
    }
}

/// Events that drive [`SessionState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user asked for a story
    Generate(GenerationRequest),
    /// The extension run finished with this story
    Completed(String),
    /// The extension run or the save failed
    Failed,
    /// The displayed story was written to the archive
    Saved,
    /// The user moved on from the displayed story
    Dismiss,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate(_) => write!(f, "Generate"),
            Self::Completed(_) => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
            Self::Saved => write!(f, "Saved"),
            Self::Dismiss => write!(f, "Dismiss"),
        }
    }
}

impl SessionState {
    /// Apply `event`, returning the next state
    ///
    /// # Errors
    ///
    /// Returns `StoryloomError::InvalidTransition` when the event is not
    /// allowed in the current state
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::session::{SessionEvent, SessionState};
    ///
    /// let state = SessionState::Idle;
    /// assert!(state.transition(SessionEvent::Saved).is_err());
    /// ```
    pub fn transition(self, event: SessionEvent) -> Result<Self> {
        match (self, event) {
            (Self::Idle, SessionEvent::Generate(request))
            | (Self::Displaying { saved: true, .. }, SessionEvent::Generate(request)) => {
                Ok(Self::Generating { request })
            }
            (Self::Generating { request }, SessionEvent::Completed(story)) => {
                Ok(Self::Displaying {
                    prompt: request.prompt,
                    story,
                    saved: false,
                })
            }
            (Self::Generating { .. }, SessionEvent::Failed)
            | (Self::Displaying { saved: false, .. }, SessionEvent::Failed) => Ok(Self::Idle),
            (Self::Displaying { prompt, story, saved: false }, SessionEvent::Saved) => {
                Ok(Self::Displaying {
                    prompt,
                    story,
                    saved: true,
                })
            }
            (Self::Displaying { saved: true, .. }, SessionEvent::Dismiss) => Ok(Self::Idle),
            (Self::Idle, SessionEvent::Dismiss) => Ok(Self::Idle),
            (state, event) => Err(StoryloomError::InvalidTransition(format!(
                "{} cannot handle {}",
                state, event
            ))
            .into()),
        }
    }
}

/// Outcome of a generate action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// No prompt was entered; nothing happened
    EmptyPrompt,
    /// A story was generated and is now displayed, not yet saved
    Generated(Extension),
}

/// One user's story session
pub struct StorySession {
    extender: StoryExtender,
    archive: ChatArchive,
    config: StoryConfig,
    prompt: String,
    target_word_count: usize,
    state: SessionState,
}

impl StorySession {
    /// Creates a session with the default target length from `config`
    pub fn new(extender: StoryExtender, archive: ChatArchive, config: StoryConfig) -> Self {
        let target_word_count = config.default_words;
        Self {
            extender,
            archive,
            config,
            prompt: String::new(),
            target_word_count,
            state: SessionState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The archive this session saves to
    pub fn archive(&self) -> &ChatArchive {
        &self.archive
    }

    /// Story settings in effect
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Prompt text entered so far
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Add a line to the multi-line prompt
    pub fn push_prompt_line(&mut self, line: &str) {
        if !self.prompt.is_empty() {
            self.prompt.push('\n');
        }
        self.prompt.push_str(line);
    }

    /// Clear the prompt text
    pub fn clear_prompt(&mut self) {
        self.prompt.clear();
    }

    /// Selected target length
    pub fn target_word_count(&self) -> usize {
        self.target_word_count
    }

    /// Select a new target length
    ///
    /// # Errors
    ///
    /// Returns `StoryloomError::LengthOutOfRange` and keeps the previous value
    /// if `words` is outside the configured range
    pub fn set_target_word_count(&mut self, words: usize) -> Result<()> {
        validate_length(words, &self.config)?;
        self.target_word_count = words;
        Ok(())
    }

    fn apply(&mut self, event: SessionEvent) -> Result<()> {
        let current = std::mem::replace(&mut self.state, SessionState::Idle);
        match current.clone().transition(event) {
            Ok(next) => {
                tracing::debug!("Session {} -> {}", current, next);
                self.state = next;
                Ok(())
            }
            Err(e) => {
                self.state = current;
                Err(e)
            }
        }
    }

    /// Generate a story from the current prompt and target length
    ///
    /// A blank prompt returns [`GenerateOutcome::EmptyPrompt`] without calling
    /// the provider or changing state. On success the session is left in
    /// `Displaying` with an unsaved story; call [`persist`](Self::persist)
    /// to archive it.
    ///
    /// # Errors
    ///
    /// Provider failures propagate and return the session to `Idle`.
    pub async fn generate(&mut self) -> Result<GenerateOutcome> {
        if self.prompt.trim().is_empty() {
            tracing::debug!("Generate requested with empty prompt");
            return Ok(GenerateOutcome::EmptyPrompt);
        }

        if matches!(self.state, SessionState::Displaying { saved: true, .. }) {
            self.apply(SessionEvent::Dismiss)?;
        }

        let request = GenerationRequest::new(
            self.prompt.clone(),
            self.target_word_count,
            &self.config,
        )?;
        self.apply(SessionEvent::Generate(request.clone()))?;

        match self
            .extender
            .extend_with_report(&request.prompt, request.target_word_count)
            .await
        {
            Ok(extension) => {
                tracing::info!(
                    "Generated story: {} words in {} chunk(s)",
                    word_count(&extension.story),
                    extension.chunks
                );
                self.apply(SessionEvent::Completed(extension.story.clone()))?;
                Ok(GenerateOutcome::Generated(extension))
            }
            Err(e) => {
                self.apply(SessionEvent::Failed)?;
                Err(e)
            }
        }
    }

    /// Save the displayed story to the archive
    ///
    /// # Errors
    ///
    /// - `StoryloomError::InvalidTransition` if no unsaved story is displayed
    /// - archive failures, which also return the session to `Idle`
    pub fn persist(&mut self) -> Result<StoryRecord> {
        let (prompt, story) = match &self.state {
            SessionState::Displaying {
                prompt,
                story,
                saved: false,
            } => (prompt.clone(), story.clone()),
            other => {
                return Err(StoryloomError::InvalidTransition(format!(
                    "{} cannot handle Saved",
                    other
                ))
                .into())
            }
        };

        match self.archive.append(&prompt, &story) {
            Ok(record) => {
                self.apply(SessionEvent::Saved)?;
                Ok(record)
            }
            Err(e) => {
                self.apply(SessionEvent::Failed)?;
                Err(e)
            }
        }
    }

    /// Load the full archive, oldest first
    pub fn history(&self) -> Result<Vec<StoryRecord>> {
        self.archive.load_all()
    }
}
