//! auth-gate - A stateless bearer-token authentication gate
//!
//! This is the main entry point for the auth-gate application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use auth_gate::auth::TokenService;
use auth_gate::config::{Config, DEFAULT_JWT_SECRET};
use auth_gate::logging::init_tracing;
use auth_gate::server::{AppState, Server};
use auth_gate::store::{CredentialStore, MemoryStore};

/// auth-gate - A stateless bearer-token authentication gate
#[derive(Parser, Debug)]
#[command(name = "auth-gate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "AUTH_GATE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting auth-gate");

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using built-in development signing secret; set auth.jwt_secret for production");
    }

    // Initialize credential store and seed configured accounts
    let store = Arc::new(MemoryStore::new());
    for (username, password) in &config.auth.users {
        match store.register(username, password).await {
            Ok(()) => info!(username = %username, "Seeded account"),
            Err(e) => warn!(username = %username, error = %e, "Failed to seed account"),
        }
    }
    info!(accounts = store.len(), "Credential store initialized");

    // Initialize token service
    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_ms,
    ));
    info!(
        token_ttl_ms = config.auth.token_ttl_ms,
        "Token service initialized"
    );

    // Create application state
    let state = AppState { store, tokens };

    // Bind and serve
    let server = Server::bind(&config.server).await?;
    info!(addr = %server.local_addr()?, "HTTP server ready");

    server.serve(state, shutdown_signal()).await?;

    info!("auth-gate stopped");
    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Resolves once the process is asked to stop (SIGINT, or SIGTERM on unix)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM");

        tokio::select! {
            _ = signal::ctrl_c() => info!("Interrupted, shutting down"),
            _ = term.recv() => info!("SIGTERM received, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
        info!("Interrupted, shutting down");
    }
}
