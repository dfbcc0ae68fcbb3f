//! Network view output
//!
//! Turns a built graph into an interactive vis-network page, either written
//! to a file or served by a small local web server.

pub mod network;
pub mod render;
pub mod routes;
pub mod server;

pub use network::{EdgeRejection, Network, RenderError};
pub use render::{
    DisplaySize, FixedDisplay, NetworkRenderer, RejectedEdge, RenderSummary, Viewport,
    network_options,
};
pub use server::{AppState, ServerConfig, start_server};
