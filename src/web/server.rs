//! Web server for the network view
//!
//! Serves the rendered view and its graph data over HTTP using Axum, as an
//! alternative to opening the written HTML file.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::graph::{NetworkGraph, Summary};

use super::render::Viewport;
use super::routes;

/// Shared application state
pub struct AppState {
    pub graph: NetworkGraph,
    pub summary: Summary,
    pub display: Viewport,
    pub dynamic_edge_size: bool,
}

/// Configuration for the web server
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            open_browser: true,
        }
    }
}

/// Build the router for the given state
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::view_routes())
        .with_state(Arc::new(state))
}

/// Start the web server and serve the view until interrupted
pub async fn start_server(
    state: AppState,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://localhost:{}", config.port);
    eprintln!("Starting web server at {}", url);

    if config.open_browser {
        eprintln!("Opening browser...");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "Could not open browser");
            eprintln!("Please open {} manually", url);
        }
    }

    eprintln!("Press Ctrl+C to stop the server");

    axum::serve(listener, app).await?;

    Ok(())
}
