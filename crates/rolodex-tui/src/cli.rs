//! CLI argument parsing for rolodex.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rolodex")]
#[command(about = "Command-palette search over your CRM records", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/rolodex/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Search a local JSON records file instead of the configured backend
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Enable debug logging (logs to /tmp/rolodex-tui.log)
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive TUI mode (default)
    Tui,

    /// One-shot search, printed by section
    Query {
        /// Search query
        query: String,
    },

    /// Show recent searches
    Recent {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
}
