use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for new records, e.g. `2024-01-01 09:30:12.123456`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One archived story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// When the story was saved; free-form text, never parsed back
    #[serde(rename = "date")]
    pub timestamp: String,
    /// The story idea as the user entered it
    pub prompt: String,
    /// Prompt plus all generated continuation
    pub story: String,
}

impl StoryRecord {
    /// Create a record stamped with the current local time
    pub fn new(prompt: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            timestamp: now_timestamp(),
            prompt: prompt.into(),
            story: story.into(),
        }
    }
}

/// Current local time formatted with [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
