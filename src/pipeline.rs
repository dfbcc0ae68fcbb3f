//! Records to network view, end to end

use std::path::Path;

use crate::graph::{NetworkGraph, build_graph};
use crate::record::Record;
use crate::sizing::normalize_sizes;
use crate::web::{DisplaySize, NetworkRenderer, RenderError, RenderSummary};

/// Settings that shape one network view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Minimum reference position for an edge to be kept
    pub threshold: usize,
    pub dynamic_node_size: bool,
    pub dynamic_edge_size: bool,
}

/// Build the graph and normalize its node sizes
pub fn prepare_graph(records: &[Record], options: &ViewOptions) -> NetworkGraph {
    let mut graph = build_graph(records, options.threshold);
    if graph.is_empty() {
        tracing::info!(threshold = options.threshold, "No reference reaches the threshold");
    }
    normalize_sizes(&mut graph.nodes, options.dynamic_node_size);
    graph
}

/// Build and size the graph, and report what a render of it would contain
/// without writing anything
pub fn preview_network_view<D: DisplaySize>(
    records: &[Record],
    options: &ViewOptions,
    display: D,
) -> (NetworkGraph, RenderSummary) {
    let graph = prepare_graph(records, options);
    let renderer = NetworkRenderer::new(display, options.dynamic_edge_size);
    let (_, summary) = renderer.build_network(&graph);
    (graph, summary)
}

/// Build, size and render the view for `records`, writing it to `path`
pub fn create_network_view<D: DisplaySize>(
    records: &[Record],
    options: &ViewOptions,
    display: D,
    path: &Path,
) -> Result<(NetworkGraph, RenderSummary), RenderError> {
    let graph = prepare_graph(records, options);
    let summary = NetworkRenderer::new(display, options.dynamic_edge_size).render(&graph, path)?;
    Ok((graph, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{FixedDisplay, Viewport};

    fn records() -> Vec<Record> {
        vec![
            Record::new("a", "d1", 100.0, vec!["b".to_string(), "c".to_string()]),
            Record::new("b", "d2", 5.0, vec![]),
        ]
    }

    #[test]
    fn test_prepare_graph_fixed_sizes() {
        let graph = prepare_graph(&records(), &ViewOptions::default());
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.nodes.iter().all(|n| n.size == 10.0));
    }

    #[test]
    fn test_prepare_graph_dynamic_sizes() {
        let options = ViewOptions {
            dynamic_node_size: true,
            ..ViewOptions::default()
        };
        let graph = prepare_graph(&records(), &options);
        assert_eq!(graph.nodes[0].size, 20.0);
        assert!((graph.nodes[1].size - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_reports_rejections() {
        let (graph, summary) =
            preview_network_view(&records(), &ViewOptions::default(), FixedDisplay::default());

        assert_eq!(graph.edges.len(), 2);
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].edge.target, "c");
    }

    #[test]
    fn test_create_network_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.html");
        let options = ViewOptions {
            threshold: 0,
            dynamic_node_size: false,
            dynamic_edge_size: true,
        };

        let (graph, summary) = create_network_view(
            &records(),
            &options,
            FixedDisplay(Viewport::new(1000, 1000)),
            &path,
        )
        .unwrap();

        assert_eq!(graph.edges.len(), 2);
        // a -> c has no node for "c"
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.rejected.len(), 1);

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("width: 800px"));
        assert!(html.contains(r#"{"from":"a","to":"b","value":0}"#));
    }
}
