//! pagelens - document snapshot and command layer for automated agents
//!
//! Main entry point for the pagelens CLI.

mod cli;
mod cmd_exec;
mod cmd_snapshot;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagelens_config::{Config, ConfigLoader, ConfigValidator};
use pagelens_core::{DocumentSpec, MemoryDocument};

use crate::cli::{Cli, Commands};

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagelens=info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(path).context("Failed to load configuration")?;
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(config)
}

pub(crate) fn load_fixture(path: &Path) -> anyhow::Result<MemoryDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    let spec: DocumentSpec = serde_json::from_str(&content)
        .with_context(|| format!("Invalid fixture {}", path.display()))?;
    Ok(MemoryDocument::from_spec(&spec))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Snapshot {
            fixture,
            json,
            all,
            cursor,
            scope,
            full,
        } => {
            let args = cmd_snapshot::SnapshotArgs {
                json,
                all,
                cursor,
                scope,
                full,
            };
            cmd_snapshot::run(&config, &fixture, args).await
        }
        Commands::Exec { fixture, script } => cmd_exec::run(&config, &fixture, &script).await,
        Commands::Tools => cmd_exec::print_tools(&config),
    }
}
