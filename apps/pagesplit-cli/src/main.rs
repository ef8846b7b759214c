//! pagesplit command line
//!
//! Reads source files, hands the bytes to `pagesplit-core`, and writes the
//! outputs back to disk.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON results
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("pagesplit v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Split(args) => commands::split(args).await?,
        Commands::Reorder(args) => commands::reorder(args).await?,
        Commands::Merge { inputs, output } => commands::merge(&inputs, &output).await?,
        Commands::Rebuild { path, output } => commands::rebuild(&path, output).await?,
        Commands::Info { path } => commands::info(&path).await?,
        Commands::Preview { path, output_dir } => commands::preview(&path, &output_dir).await?,
        Commands::Run { command_file } => commands::run(&command_file).await?,
    }

    Ok(())
}
