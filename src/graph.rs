//! Network graph construction
//!
//! Converts package records into the nodes and edges of the network view.
//!
//! ## Edge weights
//!
//! The weight of an edge is the position of the referenced package inside
//! the owning record's `References` list: the first reference has weight 0,
//! the second weight 1, and so on. The threshold keeps references at or
//! beyond a given position. This positional weighting is reproduced from the
//! tool that produced the record format and looks like an inherited defect
//! (a reference count would be the natural strength measure), but the output
//! of existing pipelines depends on it, so it is kept as-is.

use std::collections::HashSet;

use serde::Serialize;

use crate::color::color_for;
use crate::record::Record;

/// A package in the network view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// `#rrggbb`, derived from the package's directory
    pub color: String,
    /// Starts as the line count, rescaled by [`crate::sizing::normalize_sizes`]
    pub size: f64,
}

/// A reference from one package to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    /// May name a package with no record or no node
    pub target: String,
    /// Position of `target` in the source's reference list
    pub weight: usize,
}

/// Nodes and edges that survived the weight threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Summary statistics for a built graph
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub threshold: usize,
    pub total_records: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Edges whose target has no node
    pub dangling_edges: usize,
}

impl NetworkGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Count edges whose target is not one of the graph's nodes
    pub fn dangling_edge_count(&self) -> usize {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.target.as_str()))
            .count()
    }

    pub fn summary(&self, threshold: usize, total_records: usize) -> Summary {
        Summary {
            threshold,
            total_records,
            total_nodes: self.nodes.len(),
            total_edges: self.edges.len(),
            dangling_edges: self.dangling_edge_count(),
        }
    }
}

/// Build the network graph from records, keeping edges with `weight >= threshold`
///
/// Only packages that are an endpoint of a kept edge become nodes. Node and
/// edge order follows the record order, so identical input always yields
/// identical output.
pub fn build_graph(records: &[Record], threshold: usize) -> NetworkGraph {
    let mut edges: Vec<Edge> = Vec::new();
    let mut connected: HashSet<&str> = HashSet::new();

    for record in records {
        for (weight, target) in record.references.iter().enumerate() {
            if weight >= threshold {
                edges.push(Edge {
                    source: record.package_name.clone(),
                    target: target.clone(),
                    weight,
                });
                connected.insert(&record.package_name);
                connected.insert(target);
            }
        }
    }

    let nodes: Vec<Node> = records
        .iter()
        .filter(|r| connected.contains(r.package_name.as_str()))
        .map(|r| Node {
            id: r.package_name.clone(),
            label: r.package_name.clone(),
            color: color_for(&r.directory_name),
            size: r.number_of_lines,
        })
        .collect();

    tracing::debug!(
        threshold,
        records = records.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "Built network graph"
    );

    NetworkGraph { nodes, edges }
}
