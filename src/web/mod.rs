//! Web server and API endpoints for the dashboard.

pub mod config;
pub mod handlers;
pub mod router;

pub use config::WebConfig;
pub use handlers::{AppState, SharedState};
pub use router::create_app;

use crate::error::{Result, ServiceError};
use std::net::SocketAddr;
use tracing::info;

/// Start the web server with the provided state and configuration.
pub async fn start_web_server(state: SharedState, config: WebConfig) -> Result<()> {
    let app = create_app(state, &config);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| ServiceError::config_error(format!("Invalid bind address: {e}")))?;

    info!("Starting homedash server on http://{addr}");
    info!("Dashboard available at http://{addr}/");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::web_server_error(format!("Failed to bind to address: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServiceError::web_server_error(format!("Server error: {e}")))?;

    Ok(())
}
