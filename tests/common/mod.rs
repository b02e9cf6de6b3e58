use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use storyloom::providers::{CompletionRequest, CompletionResponse, GeneratedText, Provider};
use storyloom::StoryloomError;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Archive file inside `dir` seeded with raw JSON
#[allow(dead_code)]
pub fn seeded_archive(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("past_chats.json");
    fs::write(&path, contents).expect("failed to write archive");
    path
}

/// `count` copies of `word` joined by spaces
#[allow(dead_code)]
pub fn words(count: usize, word: &str) -> String {
    vec![word; count].join(" ")
}

/// In-memory provider that continues the prefix with scripted chunks
#[allow(dead_code)]
pub struct ChunkProvider {
    chunks: Mutex<VecDeque<String>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

#[allow(dead_code)]
impl ChunkProvider {
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks: Mutex::new(chunks.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ChunkProvider {
    async fn generate(&self, request: &CompletionRequest) -> storyloom::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let chunk = self
            .chunks
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| StoryloomError::Provider("no more chunks".to_string()))?;

        Ok(CompletionResponse::new(vec![
            GeneratedText::from_continuation(&request.prefix, &format!(" {}", chunk)),
        ]))
    }

    fn name(&self) -> &str {
        "chunks"
    }
}
