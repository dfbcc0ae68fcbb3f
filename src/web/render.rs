//! Network view rendering
//!
//! Hands a built graph to [`Network`] together with the fixed style and
//! physics settings, and writes the resulting page.

use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};

use crate::graph::{Edge, NetworkGraph};

use super::network::{EdgeRejection, Network, RenderError};

/// Share of the display the canvas covers
pub const CANVAS_SCALE: f64 = 0.8;

/// Pixel dimensions of a display or canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The canvas size for this display
    pub fn canvas(&self) -> Viewport {
        Viewport {
            width: (f64::from(self.width) * CANVAS_SCALE).round() as u32,
            height: (f64::from(self.height) * CANVAS_SCALE).round() as u32,
        }
    }
}

/// Source of the display size the view is laid out for
pub trait DisplaySize {
    fn display_size(&self) -> Viewport;
}

/// A display size known up front (from configuration or the command line)
#[derive(Debug, Clone, Copy)]
pub struct FixedDisplay(pub Viewport);

impl Default for FixedDisplay {
    fn default() -> Self {
        Self(Viewport::new(1920, 1080))
    }
}

impl DisplaySize for FixedDisplay {
    fn display_size(&self) -> Viewport {
        self.0
    }
}

/// Style, interaction and physics settings shared by every view
pub fn network_options() -> Value {
    json!({
        "nodes": {
            "borderWidth": 2,
            "borderWidthSelected": 4,
            "font": { "color": "#6c6c6c" },
            "shape": "circle"
        },
        "edges": {
            "color": { "color": "#eaeaea", "inherit": false },
            "smooth": { "type": "continuous" },
            "width": 0.1
        },
        "interaction": {
            "hover": true,
            "multiselect": true
        },
        "physics": {
            "forceAtlas2Based": {
                "springLength": 100,
                "avoidOverlap": 0.66
            },
            "minVelocity": 0.75,
            "solver": "forceAtlas2Based"
        }
    })
}

/// An edge that could not be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedEdge {
    pub edge: Edge,
    /// `unknown_source` or `unknown_target`
    pub kind: &'static str,
    pub reason: String,
}

/// What ended up in the view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderSummary {
    pub nodes: usize,
    pub edges: usize,
    pub rejected: Vec<RejectedEdge>,
}

/// Turns a [`NetworkGraph`] into an interactive page
pub struct NetworkRenderer<D: DisplaySize> {
    display: D,
    dynamic_edge_size: bool,
}

impl<D: DisplaySize> NetworkRenderer<D> {
    /// With `dynamic_edge_size`, edge weights are passed on so thicker
    /// lines mark references further down a package's list.
    pub fn new(display: D, dynamic_edge_size: bool) -> Self {
        Self {
            display,
            dynamic_edge_size,
        }
    }

    /// Register the graph with a fresh [`Network`].
    ///
    /// Edges with an endpoint that has no node are skipped and reported in
    /// the summary; they never abort the render.
    pub fn build_network(&self, graph: &NetworkGraph) -> (Network, RenderSummary) {
        let canvas = self.display.display_size().canvas();
        let mut net = Network::new(canvas.width, canvas.height);
        net.set_options(network_options());

        for node in &graph.nodes {
            net.add_node(&node.id, &node.label, &node.color, node.size);
        }

        let mut rejected = Vec::new();
        for edge in &graph.edges {
            let value = self.dynamic_edge_size.then_some(edge.weight);
            if let Err(reason) = net.add_edge(&edge.source, &edge.target, value) {
                tracing::trace!(%reason, "Skipping edge {} -> {}", edge.source, edge.target);
                rejected.push(RejectedEdge {
                    edge: edge.clone(),
                    kind: rejection_kind(&reason),
                    reason: reason.to_string(),
                });
            }
        }

        if !rejected.is_empty() {
            tracing::info!(count = rejected.len(), "Skipped edges with unknown endpoints");
        }

        let summary = RenderSummary {
            nodes: net.node_count(),
            edges: net.edge_count(),
            rejected,
        };
        (net, summary)
    }

    /// Render the graph to an HTML string
    pub fn render_html(
        &self,
        graph: &NetworkGraph,
    ) -> Result<(String, RenderSummary), RenderError> {
        let (net, summary) = self.build_network(graph);
        Ok((net.to_html()?, summary))
    }

    /// Render the graph and write it to `path`
    pub fn render(&self, graph: &NetworkGraph, path: &Path) -> Result<RenderSummary, RenderError> {
        let (net, summary) = self.build_network(graph);
        net.write_html(path)?;
        tracing::info!(
            path = %path.display(),
            width = net.width(),
            height = net.height(),
            nodes = summary.nodes,
            edges = summary.edges,
            "Wrote network view"
        );
        Ok(summary)
    }
}

/// Classify a rejection for callers that only need the kind
pub fn rejection_kind(rejection: &EdgeRejection) -> &'static str {
    match rejection {
        EdgeRejection::UnknownSource(_) => "unknown_source",
        EdgeRejection::UnknownTarget(_) => "unknown_target",
    }
}
