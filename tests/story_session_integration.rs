//! End-to-end session flow with an in-memory provider
//!
//! Prompt entry, extension, display state, and archive persistence together.

use std::sync::Arc;

use storyloom::commands::build_session;
use storyloom::config::Config;
use storyloom::session::{GenerateOutcome, SessionState};
use storyloom::story::{StopReason, StoryExtender};
use tempfile::TempDir;

mod common;
use common::{words, ChunkProvider};

fn config_in(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.archive.path = dir.path().join("past_chats.json");
    config
}

/// 4-word prompt, 50-word chunks, then an 8-word chunk
#[tokio::test]
async fn test_short_chunk_is_kept_and_ends_the_story() {
    let provider = Arc::new(ChunkProvider::new(vec![
        words(50, "a"),
        words(50, "b"),
        words(8, "c"),
    ]));
    let extender = StoryExtender::new(provider.clone(), Config::default().story);

    let extension = extender
        .extend_with_report("A dragon wakes up.", 150)
        .await
        .unwrap();

    assert_eq!(extension.word_count(), 112);
    assert_eq!(extension.stop_reason, StopReason::ShortChunk);
    assert!(extension.story.ends_with(&words(8, "c")));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_requests_grow_by_chunk_budget() {
    let provider = Arc::new(ChunkProvider::new(vec![words(50, "a"), words(50, "b")]));
    let extender = StoryExtender::new(provider.clone(), Config::default().story);

    extender.extend("A dragon wakes up.", 100).await.unwrap();

    let requests = provider.requests.lock().unwrap();
    let max_lengths: Vec<usize> = requests.iter().map(|r| r.max_length).collect();
    assert_eq!(max_lengths, vec![204, 254]);
    assert!(requests.iter().all(|r| r.num_return_sequences == 1));
    assert!(requests.iter().all(|r| r.pad_token_id == 50256));
    assert_eq!(requests[1].prefix, format!("A dragon wakes up. {}", words(50, "a")));
}

#[tokio::test]
async fn test_session_generates_saves_and_lists() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let provider = Arc::new(ChunkProvider::new(vec![
        words(60, "night"),
        words(60, "dawn"),
    ]));
    let mut session = build_session(&config, provider, Some(100)).unwrap();

    session.push_prompt_line("A dragon wakes up.");
    let story = match session.generate().await.unwrap() {
        GenerateOutcome::Generated(extension) => extension.story,
        GenerateOutcome::EmptyPrompt => panic!("prompt was not empty"),
    };
    session.persist().unwrap();

    assert!(matches!(
        session.state(),
        SessionState::Displaying { saved: true, .. }
    ));
    assert!(story.starts_with("A dragon wakes up. night"));

    let history = session.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].prompt, "A dragon wakes up.");
    assert_eq!(history[0].story, story);
}

#[tokio::test]
async fn test_empty_prompt_leaves_archive_untouched() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let provider = Arc::new(ChunkProvider::new(vec![words(60, "x")]));
    let mut session = build_session(&config, provider.clone(), None).unwrap();

    let outcome = session.generate().await.unwrap();

    assert_eq!(outcome, GenerateOutcome::EmptyPrompt);
    assert_eq!(provider.call_count(), 0);
    assert!(!config.archive.path.exists());
}

#[tokio::test]
async fn test_failed_generation_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    // One chunk for a story that needs two: the second call fails
    let provider = Arc::new(ChunkProvider::new(vec![words(50, "x")]));
    let mut session = build_session(&config, provider, Some(100)).unwrap();
    session.set_prompt("A dragon wakes up.");

    assert!(session.generate().await.is_err());
    assert_eq!(session.state(), &SessionState::Idle);
    assert!(session.history().unwrap().is_empty());
}
