//! Expense tracker API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────────┐
//!                      │                  EXPENSE TRACKER API                  │
//!                      │                                                       │
//!   Client Request     │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ───────────────────┼─▶│  layers  │──▶│  bearer  │──▶│ typed extractor  │   │
//!                      │  │ id/trace │   │middleware│   │ owner + validate │   │
//!                      │  └──────────┘   └────┬─────┘   └────────┬─────────┘   │
//!                      │                      │                  ▼             │
//!                      │              ┌───────▼──────┐   ┌──────────────────┐   │
//!                      │              │token verifier│   │ handler + unit   │   │
//!                      │              │ (Firebase)   │   │ of work (sqlx)   │   │
//!                      │              └──────────────┘   └────────┬─────────┘   │
//!                      │                                          ▼             │
//!   JSON Response      │                                 ┌──────────────────┐   │
//!   ◀──────────────────┼─────────────────────────────────│ reports / rows   │   │
//!                      │                                 └──────────────────┘   │
//!                      └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use expense_tracker_api::config::load_config;
use expense_tracker_api::lifecycle::{self, signals, Shutdown};
use expense_tracker_api::observability::logging;

#[derive(Parser)]
#[command(name = "expense-tracker-api")]
#[command(about = "Personal expense tracking HTTP API", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus environment are used without one.
    #[arg(short, long, env = "TRACKER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.observability.log_level);

    tracing::info!("expense-tracker-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_provider = ?config.auth.provider,
        pie_share_mode = ?config.reports.pie_share_mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let server = lifecycle::bootstrap(config).await?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
