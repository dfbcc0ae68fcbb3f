//! # dependency-network - Package Dependency Network Views
//!
//! Turns per-package dependency records into an interactive network view:
//! which packages reference which, filtered by a weight threshold, with node
//! color grouping packages by directory and node size reflecting line count.
//!
//! ## Usage
//!
//! ```bash
//! # Produce records from a source tree
//! depnet scan ./src python -o data.json
//!
//! # Draw the network, keeping references from position 2 onwards
//! depnet analyze --create-network-view --limit 2 --dynamic-node-size
//!
//! # Export the reference table as CSV
//! depnet analyze --create-csv
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! records -> build_graph -> normalize_sizes -> NetworkRenderer -> HTML
//! ```
//!
//! Edge weights are positional: the n-th entry of a package's reference list
//! has weight n. See [`graph`] for why this is kept.

pub mod cache;
pub mod color;
pub mod config;
pub mod graph;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod scan;
pub mod sizing;
pub mod web;

pub use cache::{
    CacheError, ReferenceColumn, ReferenceTable, TableSource, load_cache, load_or_build,
    write_cache, write_csv, write_csv_to,
};
pub use color::color_for;
pub use config::{
    CompiledConfig, ConfigError, DepnetConfig, DisplayConfig, FilesConfig, GraphConfig,
    ScanConfig, load_compiled_config, load_config,
};
pub use graph::{Edge, NetworkGraph, Node, Summary, build_graph};
pub use pipeline::{ViewOptions, create_network_view, prepare_graph, preview_network_view};
pub use record::{Record, RecordError, load_records, parse_records, validate_records, write_records};
pub use report::{generate_json_summary, generate_summary};
pub use scan::{Language, ReferenceExtractor, ScanError, scan_directory, scan_file};
pub use sizing::{FIXED_NODE_SIZE, MAX_DYNAMIC_NODE_SIZE, normalize_sizes};
pub use web::{
    DisplaySize, EdgeRejection, FixedDisplay, Network, NetworkRenderer, RenderError,
    RenderSummary, Viewport,
};
