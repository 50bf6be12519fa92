//! CLI definitions for pagelens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pagelens CLI.
#[derive(Parser)]
#[command(name = "pagelens")]
#[command(about = "Compact page snapshots and ref-qualified commands for automated agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.pagelens/config.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Snapshot a document fixture and print the outline
    Snapshot {
        /// Document fixture (JSON)
        fixture: PathBuf,

        /// Print the snapshot envelope instead of the outline
        #[arg(long)]
        json: bool,

        /// Include non-interactive nodes
        #[arg(long)]
        all: bool,

        /// Treat `cursor: pointer` elements as interactive
        #[arg(long)]
        cursor: bool,

        /// CSS selector for the snapshot root
        #[arg(long)]
        scope: Option<String>,

        /// Keep structural nodes with nothing to show
        #[arg(long)]
        full: bool,
    },

    /// Run a script of tool calls against a document fixture
    Exec {
        /// Document fixture (JSON)
        fixture: PathBuf,

        /// Script: JSON array of `{"tool": ..., "params": {...}}`
        script: PathBuf,
    },

    /// Print the tool definitions in function-calling format
    Tools,
}
