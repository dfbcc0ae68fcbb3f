//! HTTP routes for the network view

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Serialize;

use crate::graph::{Edge, Node, Summary};

use super::render::{FixedDisplay, NetworkRenderer};
use super::server::AppState;

/// Graph data as served to API clients
#[derive(Serialize)]
struct GraphResponse<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
    summary: &'a Summary,
}

/// Create API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/graph", get(get_graph))
        .route("/api/health", get(health_check))
}

/// Create the page route
pub fn view_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index_html))
}

/// GET /api/graph - Returns the built graph
async fn get_graph(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(GraphResponse {
        nodes: &state.graph.nodes,
        edges: &state.graph.edges,
        summary: &state.summary,
    })
    .into_response()
}

/// GET /api/health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// GET / - The rendered network view
async fn index_html(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let renderer = NetworkRenderer::new(FixedDisplay(state.display), state.dynamic_edge_size);

    match renderer.render_html(&state.graph) {
        Ok((html, _)) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render network view");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render network view: {}", e),
            )
                .into_response()
        }
    }
}
