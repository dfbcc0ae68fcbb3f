//! vis-network document model
//!
//! Holds the nodes, edges and options of one interactive view and emits them
//! as a standalone HTML page. Layout and physics run in the browser.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_embed::RustEmbed;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Embedded page template
#[derive(RustEmbed)]
#[folder = "web-assets/"]
struct Assets;

const TEMPLATE_NAME: &str = "network.html";

/// Errors that can occur while producing the view
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write network view: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize network data: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Embedded asset '{0}' not found")]
    MissingTemplate(&'static str),
}

/// Why an edge could not be added
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeRejection {
    #[error("unknown source node '{0}'")]
    UnknownSource(String),

    #[error("unknown target node '{0}'")]
    UnknownTarget(String),
}

#[derive(Debug, Clone, Serialize)]
struct VisNode {
    id: String,
    label: String,
    color: String,
    size: f64,
}

#[derive(Debug, Clone, Serialize)]
struct VisEdge {
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<usize>,
}

/// An interactive network view under construction
#[derive(Debug)]
pub struct Network {
    width: u32,
    height: u32,
    nodes: Vec<VisNode>,
    edges: Vec<VisEdge>,
    node_ids: HashSet<String>,
    options: Value,
}

impl Network {
    /// Create an empty view with a canvas of the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_ids: HashSet::new(),
            options: Value::Object(Default::default()),
        }
    }

    pub fn set_options(&mut self, options: Value) {
        self.options = options;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add a node. A node whose id is already present is ignored.
    pub fn add_node(&mut self, id: &str, label: &str, color: &str, size: f64) {
        if !self.node_ids.insert(id.to_string()) {
            return;
        }
        self.nodes.push(VisNode {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            size,
        });
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        value: Option<usize>,
    ) -> Result<(), EdgeRejection> {
        if !self.node_ids.contains(from) {
            return Err(EdgeRejection::UnknownSource(from.to_string()));
        }
        if !self.node_ids.contains(to) {
            return Err(EdgeRejection::UnknownTarget(to.to_string()));
        }
        self.edges.push(VisEdge {
            from: from.to_string(),
            to: to.to_string(),
            value,
        });
        Ok(())
    }

    /// Emit the view as a standalone HTML page
    pub fn to_html(&self) -> Result<String, RenderError> {
        let asset =
            Assets::get(TEMPLATE_NAME).ok_or(RenderError::MissingTemplate(TEMPLATE_NAME))?;
        let template = String::from_utf8_lossy(&asset.data);

        Ok(template
            .replace("{{WIDTH}}", &self.width.to_string())
            .replace("{{HEIGHT}}", &self.height.to_string())
            .replace("{{NODES}}", &script_json(&self.nodes)?)
            .replace("{{EDGES}}", &script_json(&self.edges)?)
            .replace("{{OPTIONS}}", &script_json(&self.options)?))
    }

    /// Write the HTML page to `path`
    pub fn write_html(&self, path: &Path) -> Result<(), RenderError> {
        let html = self.to_html()?;
        fs::write(path, html)?;
        Ok(())
    }
}

/// Serialize for inlining inside a `<script>` element.
///
/// `{{` only occurs inside JSON strings, where it is rewritten as an escape
/// so inserted data can never be taken for a template placeholder.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?
        .replace("</", "<\\/")
        .replace("{{", "{\\u007b"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_rejects_unknown_endpoints() {
        let mut net = Network::new(100, 100);
        net.add_node("a", "a", "#000000", 1.0);

        assert_eq!(
            net.add_edge("a", "ghost", None),
            Err(EdgeRejection::UnknownTarget("ghost".to_string()))
        );
        assert_eq!(
            net.add_edge("ghost", "a", None),
            Err(EdgeRejection::UnknownSource("ghost".to_string()))
        );
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_node_ignored() {
        let mut net = Network::new(100, 100);
        net.add_node("a", "first", "#000000", 1.0);
        net.add_node("a", "second", "#ffffff", 2.0);
        assert_eq!(net.node_count(), 1);
    }

    #[test]
    fn test_html_contains_data() {
        let mut net = Network::new(640, 480);
        net.add_node("a", "a", "#123456", 10.0);
        net.add_node("b", "b", "#654321", 10.0);
        net.add_edge("a", "b", Some(3)).unwrap();

        let html = net.to_html().unwrap();
        assert!(html.contains("width: 640px"));
        assert!(html.contains("height: 480px"));
        assert!(html.contains(r##""color":"#123456""##));
        assert!(html.contains(r#"{"from":"a","to":"b","value":3}"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_value_omitted_when_none() {
        let mut net = Network::new(1, 1);
        net.add_node("a", "a", "#000000", 1.0);
        net.add_edge("a", "a", None).unwrap();

        let html = net.to_html().unwrap();
        assert!(html.contains(r#"{"from":"a","to":"a"}"#));
    }

    #[test]
    fn test_script_breakout_escaped() {
        let mut net = Network::new(1, 1);
        net.add_node("x", "</script><b>", "#000000", 1.0);

        let html = net.to_html().unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains(r"<\/script><b>"));
    }

    fn script_value(html: &str, prefix: &str, suffix: &str) -> serde_json::Value {
        let line = html
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with(prefix))
            .unwrap();
        let json = line.strip_prefix(prefix).unwrap().strip_suffix(suffix).unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_placeholder_names_stay_data() {
        let mut net = Network::new(1, 1);
        net.set_options(serde_json::json!({ "physics": false }));
        net.add_node("{{EDGES}}", "{{OPTIONS}}", "#000000", 1.0);
        net.add_node("b", "{{{NODES}}}", "#000000", 1.0);
        net.add_edge("b", "{{EDGES}}", None).unwrap();

        let html = net.to_html().unwrap();
        assert!(!html.contains("{{"));

        let nodes = script_value(&html, "const nodes = new vis.DataSet(", ");");
        assert_eq!(nodes[0]["id"], "{{EDGES}}");
        assert_eq!(nodes[0]["label"], "{{OPTIONS}}");
        assert_eq!(nodes[1]["label"], "{{{NODES}}}");

        let edges = script_value(&html, "const edges = new vis.DataSet(", ");");
        assert_eq!(edges[0]["to"], "{{EDGES}}");

        let options = script_value(&html, "const options = ", ";");
        assert_eq!(options["physics"], false);
    }
}
