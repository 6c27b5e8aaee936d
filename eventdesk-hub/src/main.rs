//! eventdesk-hub - Event admin backend
//!
//! Serves the expense, roster, rota, tag registry and live attendance API,
//! and drives the device bridge on the local network.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eventdesk_common::config::{self, TomlConfig};
use eventdesk_common::{db, time};
use eventdesk_hub::services::{HeaderIdentityGate, HttpDeviceBridge};
use eventdesk_hub::{build_router, AppState, HubSettings};
use tokio::signal;
use tracing::info;

/// Command-line arguments for eventdesk-hub
#[derive(Parser, Debug)]
#[command(name = "eventdesk-hub")]
#[command(about = "Event admin backend with RFID attendance")]
#[command(version)]
struct Args {
    /// Root folder holding the database (else EVENTDESK_ROOT_FOLDER, config, default)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "EVENTDESK_PORT")]
    port: Option<u16>,

    /// Device bridge base URL (overrides config)
    #[arg(long, env = "EVENTDESK_BRIDGE_URL")]
    bridge_url: Option<String>,

    /// Bearer token required on API requests (overrides config)
    #[arg(long, env = "EVENTDESK_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut toml_config = TomlConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .init();

    info!(
        "Starting EventDesk hub ({}) v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    if let Some(port) = args.port {
        toml_config.port = port;
    }
    if let Some(url) = args.bridge_url {
        toml_config.bridge.base_url = url;
    }
    if args.api_token.is_some() {
        toml_config.api_token = args.api_token;
    }

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::prepare_database_path(&root_folder)
        .context("Failed to prepare root folder")?;
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let bridge = HttpDeviceBridge::new(
        &toml_config.bridge.base_url,
        time::millis_to_duration(toml_config.bridge.request_timeout_ms),
    )
    .context("Failed to build device bridge client")?;
    info!("Device bridge: {}", bridge.base_url());

    if toml_config.api_token.is_none() {
        info!("API token not configured; trusting x-owner-id from the proxy");
    }

    let settings = HubSettings {
        poll_interval: time::millis_to_duration(toml_config.bridge.poll_interval_ms),
        utc_offset: time::fixed_offset(toml_config.utc_offset_minutes)
            .context("Invalid utc_offset_minutes")?,
    };

    let state = AppState::new(
        pool,
        Arc::new(bridge),
        Arc::new(HeaderIdentityGate::new(toml_config.api_token.clone())),
        settings,
    );
    let app = build_router(state.clone());

    let addr: SocketAddr = format!("{}:{}", toml_config.bind_address, toml_config.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("eventdesk-hub listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
