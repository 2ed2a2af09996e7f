// binance-mcp: a Binance ticker tool server written in Rust
// Copyright (C) 2024 Harrison
//
// This program is part of binance-mcp and is released under the GNU GPL v3
// or later. See the LICENSE file for details.

mod server;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use binance_core::service::tools::GET_TICKER_PRICE;
use binance_core::{Credentials, Settings};
use state::AppState;

#[derive(Parser)]
#[command(name = "binance-mcp")]
#[command(about = "Binance ticker price tool server over stdio")]
struct Cli {
    /// Extra configuration file layered over config/{RUN_MODE}
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (overrides the configured level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tool calls on stdin/stdout (default)
    Serve,
    /// Call get-ticker-price once and print the result
    Price {
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(cli.log_level.as_deref().unwrap_or(settings.log.level.as_str()));

    let credentials = Credentials::from_env();
    info!(
        api_url = %settings.api.base_url,
        authenticated = credentials.api_key().is_some(),
        signing = credentials.has_secret(),
        "Starting {}",
        state::SERVER_NAME
    );

    let state = Arc::new(AppState::new(&settings, credentials)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = server::run_stdio(state).await {
                error!("Server error: {}", e);
                return Err(e);
            }
        }
        Commands::Price { symbol } => {
            let arguments = serde_json::json!({ "symbol": symbol });
            let output = state
                .tools
                .call(GET_TICKER_PRICE, arguments.as_object())
                .await;

            if output.is_error {
                anyhow::bail!(output.text);
            }
            println!("{}", output.text);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries MCP frames.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
