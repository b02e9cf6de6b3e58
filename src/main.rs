//! Storyloom - long-form story generator CLI
//!
#![doc = "Storyloom - long-form story generator CLI"]
#![doc = "Main entry point for the Storyloom application."]

use anyhow::Result;

use storyloom::cli::{Cli, Commands};
use storyloom::commands;
use storyloom::config::Config;
use storyloom::logging::init_tracing;
use storyloom::storage::ChatArchive;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs)?;

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Shell { length } => {
            tracing::info!("Starting interactive story shell");
            if let Some(words) = length {
                tracing::debug!("Using initial target length: {}", words);
            }

            // Moves `config` into the handler (match arms are exclusive)
            commands::shell::run_shell(config, length).await?;
            Ok(())
        }
        Commands::Generate { prompt, length } => {
            tracing::info!("Starting one-shot generation");
            tracing::debug!("Using provider: {}", config.provider.provider_type);

            commands::generate::run_generate(config, prompt, length).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            let archive = ChatArchive::new(&config.archive.path);
            commands::history::handle_history(command, &archive)?;
            Ok(())
        }
    }
}
