//! Command-line interface definition for Storyloom
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive shell, one-shot generation,
//! and browsing the story archive.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storyloom - grow short story ideas into long-form stories
///
/// Extends a prompt with repeated calls to a text-generation model and
/// keeps every generated story in a JSON archive for later browsing.
#[derive(Parser, Debug, Clone)]
#[command(name = "storyloom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the story archive file
    #[arg(short, long, global = true)]
    pub archive: Option<PathBuf>,

    /// Override the provider from config (ollama, huggingface)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Storyloom
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive story shell
    Shell {
        /// Initial target story length in words
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Generate a single story and save it to the archive
    Generate {
        /// Story idea or opening lines
        #[arg(short, long)]
        prompt: String,

        /// Target story length in words
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Browse previously generated stories
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// Archive browsing subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List archived stories, most recent first
    List {
        /// Print the raw archive records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one archived story in full
    Show {
        /// Story number as shown by `history list`
        number: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
