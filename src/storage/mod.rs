//! Story archive
//!
//! Past stories live in a single human-readable JSON file holding an array of
//! `{date, prompt, story}` objects in the order they were generated. A missing
//! file is an empty archive. Every append reads the whole file and rewrites it;
//! there is no locking, so concurrent writers can lose updates.

use crate::error::{Result, StoryloomError};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{now_timestamp, StoryRecord, TIMESTAMP_FORMAT};

/// Append-only archive of generated stories backed by a JSON file
#[derive(Debug, Clone)]
pub struct ChatArchive {
    path: PathBuf,
}

impl ChatArchive {
    /// Create an archive handle for `path`
    ///
    /// Nothing is read or created until the first load or append.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom::storage::ChatArchive;
    ///
    /// let archive = ChatArchive::new("/tmp/storyloom-doc/past_chats.json");
    /// assert!(archive.path().ends_with("past_chats.json"));
    /// ```
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record, oldest first
    ///
    /// # Errors
    ///
    /// - `StoryloomError::Storage` if the file exists but cannot be read
    /// - `StoryloomError::ArchiveParse` if its content is not a valid record array
    pub fn load_all(&self) -> Result<Vec<StoryRecord>> {
        if !self.path.exists() {
            tracing::debug!("Archive {} not found, treating as empty", self.path.display());
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read archive {}", self.path.display()))
            .map_err(|e| StoryloomError::Storage(format!("{:#}", e)))?;

        let records: Vec<StoryRecord> = serde_json::from_str(&contents).map_err(|e| {
            tracing::error!("Archive {} is malformed: {}", self.path.display(), e);
            StoryloomError::ArchiveParse(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            "Loaded {} record(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Append a new record stamped with the current time and rewrite the file
    ///
    /// # Returns
    ///
    /// Returns the record that was stored
    ///
    /// # Errors
    ///
    /// Propagates any load error, and `StoryloomError::Storage` if the file
    /// cannot be written
    pub fn append(&self, prompt: &str, story: &str) -> Result<StoryRecord> {
        let record = StoryRecord::new(prompt, story);
        self.append_record(record.clone())?;
        Ok(record)
    }

    /// Append an already-built record and rewrite the file
    pub fn append_record(&self, record: StoryRecord) -> Result<()> {
        let mut records = self.load_all()?;
        records.push(record);
        self.write_all(&records)?;

        tracing::info!(
            "Saved story #{} to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_all(&self, records: &[StoryRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create archive directory")
                    .map_err(|e| StoryloomError::Storage(format!("{:#}", e)))?;
            }
        }

        let contents = to_pretty_json(records)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write archive {}", self.path.display()))
            .map_err(|e| StoryloomError::Storage(format!("{:#}", e)))?;

        Ok(())
    }
}

/// Serialize with four-space indentation
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(StoryloomError::Serialization)?;
    Ok(buf)
}
