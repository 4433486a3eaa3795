//! Codechat CLI entry point.
//!
//! Binary name: `codechat`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,codechat=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Initialize application state (DB, services)
    let state = AppState::init().await?;

    match cli.command {
        Commands::List => {
            cli::conversation::list_conversations(&state, cli.json).await?;
        }

        Commands::New { title } => {
            cli::conversation::new_conversation(&state, title, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::conversation::show_conversation(&state, &id, cli.json).await?;
        }

        Commands::Rename { id, title } => {
            cli::conversation::rename_conversation(&state, &id, &title, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::conversation::delete_conversation(&state, &id, force, cli.json).await?;
        }

        Commands::DeleteMessage { id, message_id } => {
            cli::conversation::delete_message(&state, &id, message_id, cli.json).await?;
        }

        Commands::Chat { id, instructions } => {
            cli::chat::run_chat_loop(&state, id, instructions.as_deref()).await?;
        }
    }

    Ok(())
}
