//! Command-line interface for block_four.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Block Four - four-in-a-row on a 7x7 board
#[derive(Parser, Debug)]
#[command(name = "block_four")]
#[command(about = "Relay server and offline client for Block Four", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket relay server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play on this terminal, two players sharing the keyboard
    Offline,
}
