//! Block Four - unified CLI
//!
//! Runs the relay server or a same-device game in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use block_four::{GameServer, ServerConfig, run_offline};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => run_server(host, port, config).await,
        Command::Offline => run_offline(),
    }
}

/// Run the WebSocket relay server
#[instrument(skip_all)]
async fn run_server(host: Option<String>, port: Option<u16>, config: Option<PathBuf>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,block_four=debug")),
        )
        .init();

    // File, then PORT, then flags.
    let config = ServerConfig::load(config.as_deref())?
        .apply_env()?
        .with_overrides(host, port);

    let address = config.bind_address();
    info!(%address, "Starting Block Four server");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    GameServer::new(config).serve(listener).await?;
    Ok(())
}
