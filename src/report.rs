//! Run summaries
//!
//! Human-readable and JSON summaries of a built network view.

use std::io::{self, Write};

use serde::Serialize;

use crate::graph::Summary;
use crate::web::RenderSummary;

/// Number of skipped edges listed individually in the text summary
const MAX_LISTED_REJECTIONS: usize = 10;

/// Write a text summary of the graph and, if it was rendered, of the view
pub fn generate_summary<W: Write>(
    summary: &Summary,
    render: Option<&RenderSummary>,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "Dependency Network")?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(
        writer,
        "Records: {} | Threshold: {} | Nodes: {} | Edges: {}",
        summary.total_records, summary.threshold, summary.total_nodes, summary.total_edges
    )?;

    if summary.total_edges == 0 {
        writeln!(writer)?;
        writeln!(writer, "No reference reaches the threshold; the view is empty.")?;
    } else if summary.dangling_edges > 0 {
        writeln!(
            writer,
            "Dangling edges: {} (target has no node)",
            summary.dangling_edges
        )?;
    }

    if let Some(render) = render {
        writeln!(writer)?;
        writeln!(
            writer,
            "View: {} nodes, {} edges drawn, {} skipped",
            render.nodes,
            render.edges,
            render.rejected.len()
        )?;

        for rejected in render.rejected.iter().take(MAX_LISTED_REJECTIONS) {
            writeln!(
                writer,
                "  - {} -> {}: {}",
                rejected.edge.source, rejected.edge.target, rejected.reason
            )?;
        }
        if render.rejected.len() > MAX_LISTED_REJECTIONS {
            writeln!(
                writer,
                "  ... and {} more",
                render.rejected.len() - MAX_LISTED_REJECTIONS
            )?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    graph: &'a Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<&'a RenderSummary>,
}

/// Write the same summary as JSON
pub fn generate_json_summary<W: Write>(
    summary: &Summary,
    render: Option<&RenderSummary>,
    writer: &mut W,
) -> io::Result<()> {
    let output = JsonSummary {
        graph: summary,
        view: render,
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::web::RejectedEdge;

    fn summary(edges: usize, dangling: usize) -> Summary {
        Summary {
            threshold: 1,
            total_records: 4,
            total_nodes: 3,
            total_edges: edges,
            dangling_edges: dangling,
        }
    }

    fn rejected(target: &str) -> RejectedEdge {
        RejectedEdge {
            edge: Edge {
                source: "a".to_string(),
                target: target.to_string(),
                weight: 1,
            },
            kind: "unknown_target",
            reason: format!("unknown target node '{}'", target),
        }
    }

    fn text(summary: &Summary, render: Option<&RenderSummary>) -> String {
        let mut out = Vec::new();
        generate_summary(summary, render, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let out = text(&summary(5, 2), None);
        assert!(out.contains("Records: 4 | Threshold: 1 | Nodes: 3 | Edges: 5"));
        assert!(out.contains("Dangling edges: 2"));
        assert!(!out.contains("View:"));
    }

    #[test]
    fn test_empty_view_notice() {
        let out = text(&summary(0, 0), None);
        assert!(out.contains("the view is empty"));
    }

    #[test]
    fn test_rejections_are_truncated() {
        let render = RenderSummary {
            nodes: 3,
            edges: 1,
            rejected: (0..12).map(|i| rejected(&format!("x{}", i))).collect(),
        };
        let out = text(&summary(13, 12), Some(&render));

        assert!(out.contains("View: 3 nodes, 1 edges drawn, 12 skipped"));
        assert!(out.contains("a -> x0: unknown target node 'x0'"));
        assert!(!out.contains("x10"));
        assert!(out.contains("... and 2 more"));
    }

    #[test]
    fn test_json_summary() {
        let mut out = Vec::new();
        generate_json_summary(&summary(5, 2), None, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["graph"]["total_edges"], 5);
        assert_eq!(value["graph"]["dangling_edges"], 2);
        assert!(value.get("view").is_none());
    }
}
