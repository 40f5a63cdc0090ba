use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod pages;

#[derive(Parser)]
#[command(name = "sparky")]
#[command(about = "Sparky - AI sales assistant for firesites.tech", long_about = None)]
struct Cli {
    /// Override the conversation state directory (defaults to ~/.config/sparky/state)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive chat shell (default)
    Chat,
    /// Clear the persisted conversation, intake data, and draft
    Reset,
    /// Print the resolved configuration and state locations
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never tangle with the shell output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(cli.state_dir).await,
        Commands::Reset => commands::reset::run(cli.state_dir).await,
        Commands::Paths => commands::paths::run(),
    }
}
