use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradegate_core::{
    load_config, validate_config, DisclosureClient, Extractor, FetchOrchestrator, PortalExtractor,
};

use tradegate_server::api::create_router;
use tradegate_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TRADEGATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");

    // Log a config fingerprint so deployments are distinguishable
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create disclosure client if configured
    let disclosure = match &config.disclosure {
        Some(disclosure_config) => {
            info!("Initializing disclosure API client");
            match DisclosureClient::new(disclosure_config.clone()) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    error!("Failed to create disclosure client: {}", e);
                    None
                }
            }
        }
        None => {
            info!("Disclosure API not configured, financials endpoints disabled");
            None
        }
    };

    // Create the trade collector with the portal extraction backend
    let extractor: Arc<dyn Extractor> =
        Arc::new(PortalExtractor::new(config.collector.portal.clone()));
    let collector = Arc::new(FetchOrchestrator::new(extractor));
    info!(
        "Trade collector initialized (portal: {})",
        config.collector.portal.base_url
    );

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        disclosure,
        Arc::clone(&collector),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Release the shared portal session before exiting
    info!("Server shutting down...");
    collector.shutdown().await;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
