//! drive-cli - Command-line tool to inspect the state of a connected vehicle
//!
//! Refreshes the status document of one vehicle and prints typed views of it.

mod commands;
mod config;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use drive_client::DriveClient;
use drive_core::VehicleState;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ArgOverrides, Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "drive-cli")]
#[command(author, version, about = "Connected vehicle state CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Backend URL
    #[arg(short, long, env = "DRIVE_SERVER")]
    server: Option<String>,

    /// Bearer token for the backend
    #[arg(short, long, env = "DRIVE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Vehicle identification number
    #[arg(long, env = "DRIVE_VIN")]
    vin: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "DRIVE_CONFIG")]
    config: Option<PathBuf>,

    /// Read a stored status response instead of querying the backend
    #[arg(long, value_name = "FILE")]
    from_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of the vehicle state
    Status,

    /// List doors, hood and trunk
    Lids,

    /// List windows
    Windows,

    /// List condition based services
    Services,

    /// Show the last known GPS position
    Position,

    /// Dump the unparsed status attributes
    Raw,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(ArgOverrides {
        server: cli.server.as_deref(),
        token: cli.token.as_deref(),
        vin: cli.vin.as_deref(),
        output: cli.output.map(|o| o.as_str()),
        no_color: cli.no_color,
    });

    let format = OutputFormat::from_str(&merged.output, true)
        .map_err(|e| anyhow::anyhow!("Invalid output format '{}': {}", merged.output, e))?;
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);

    let state = load_state(&merged, cli.from_file.as_deref()).await?;

    match cli.command {
        Commands::Status => commands::status(&state, &ctx)?,
        Commands::Lids => commands::lids(&state, &ctx)?,
        Commands::Windows => commands::windows(&state, &ctx)?,
        Commands::Services => commands::services(&state, &ctx)?,
        Commands::Position => commands::position(&state, &ctx)?,
        Commands::Raw => commands::raw(&state)?,
    }

    Ok(())
}

/// Create the vehicle state and fill it from the backend or a stored response
async fn load_state(merged: &MergedConfig, from_file: Option<&Path>) -> Result<VehicleState> {
    let vin = merged
        .vin
        .clone()
        .context("No vehicle given (use --vin, DRIVE_VIN or the config file)")?;

    debug!(vin = %vin, server = %merged.server, "Loading vehicle state");
    let client = create_client(merged)?;
    let mut state = VehicleState::new(Arc::new(client), vin);

    if let Some(path) = from_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read status file: {}", path.display()))?;
        let response: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse status file: {}", path.display()))?;
        state.load_response(response)?;
    } else {
        state
            .refresh()
            .await
            .context("Failed to refresh vehicle state")?;
    }

    Ok(state)
}

/// Create a drive client for the configured server
fn create_client(merged: &MergedConfig) -> Result<DriveClient> {
    let client = match &merged.token {
        Some(token) => DriveClient::with_bearer_token(&merged.server, token),
        None => DriveClient::new(&merged.server),
    };
    client.context("Failed to create drive client")
}
