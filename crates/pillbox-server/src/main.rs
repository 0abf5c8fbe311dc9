//! # pillbox-server
//!
//! HTTP server for the pillbox medication reminder.
//!
//! This binary provides:
//! - REST API for expiry classification and dose scheduling
//! - OpenAPI documentation via Swagger UI
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package pillbox-server
//!
//! # Production
//! PILLBOX_ENV=production PILLBOX_CONFIG=/etc/pillbox/config.toml ./pillbox-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::path::PathBuf;

use pillbox_core::default_config_path;
use pillbox_server::api::create_router;
use pillbox_server::logging;
use pillbox_server::state::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("PILLBOX_ENV").is_ok_and(|env| env == "production");
    logging::init(is_production)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting pillbox-server");

    let config_path =
        std::env::var_os("PILLBOX_CONFIG").map_or_else(default_config_path, PathBuf::from);
    let state = AppState::load(&config_path)?;
    let addr = state.config.bind_address()?;

    info!(timezone = %state.timezone.name(), "Configuration loaded");

    let app = create_router(state.into_shared());
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
