//! Configuration file support for depnet
//!
//! This module handles parsing `.depnet.toml` configuration files that set
//! graph defaults, the display size the view is laid out for, file
//! locations and scanner exclusions.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .depnet.toml
//!
//! [graph]
//! # Minimum reference position for an edge to be drawn
//! threshold = 0
//! dynamic_node_size = false
//! dynamic_edge_size = false
//!
//! [display]
//! # Size of the screen the view is made for; the canvas covers 80% of it
//! width = 1920
//! height = 1080
//!
//! [files]
//! input = "data.json"
//! cache = ".da_df_cache"
//! csv = "output_data.csv"
//! view = "da_network_view.html"
//!
//! [scan]
//! # Paths (relative to the scanned directory) to skip
//! exclude = ["tests/*", "vendor/*"]
//! ```

use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::web::render::Viewport;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(String),
}

/// Graph construction defaults
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphConfig {
    #[serde(default)]
    pub threshold: usize,

    /// Scale node sizes by line count instead of drawing them all alike
    #[serde(default)]
    pub dynamic_node_size: bool,

    /// Pass edge weights on to the view
    #[serde(default)]
    pub dynamic_edge_size: bool,
}

/// Display size section
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DisplayConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// File locations section
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_cache")]
    pub cache: PathBuf,

    #[serde(default = "default_csv")]
    pub csv: PathBuf,

    #[serde(default = "default_view")]
    pub view: PathBuf,
}

fn default_input() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_cache() -> PathBuf {
    PathBuf::from(".da_df_cache")
}

fn default_csv() -> PathBuf {
    PathBuf::from("output_data.csv")
}

fn default_view() -> PathBuf {
    PathBuf::from("da_network_view.html")
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            cache: default_cache(),
            csv: default_csv(),
            view: default_view(),
        }
    }
}

/// Scanner section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScanConfig {
    /// Paths to skip, relative to the scanned directory
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DepnetConfig {
    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

/// Configuration with compiled glob patterns
#[derive(Debug)]
pub struct CompiledConfig {
    pub graph: GraphConfig,
    pub display: DisplayConfig,
    pub files: FilesConfig,
    exclude_patterns: Vec<Pattern>,
}

impl CompiledConfig {
    /// Create a compiled config from raw config
    pub fn from_config(config: DepnetConfig) -> Result<Self, ConfigError> {
        let exclude_patterns = config
            .scan
            .exclude
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| ConfigError::PatternError(format!("{}: {}", p, e))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            graph: config.graph,
            display: config.display,
            files: config.files,
            exclude_patterns,
        })
    }

    /// Create a config with every setting at its default
    pub fn empty() -> Self {
        Self {
            graph: GraphConfig::default(),
            display: DisplayConfig::default(),
            files: FilesConfig::default(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Check if a path should be skipped by the scanner
    pub fn should_exclude(&self, path: &str) -> bool {
        self.exclude_patterns.iter().any(|p| p.matches(path))
    }

    pub fn has_exclusions(&self) -> bool {
        !self.exclude_patterns.is_empty()
    }
}

/// Load configuration from the project directory
///
/// Searches for `.depnet.toml` in the given directory and parent directories.
/// An explicit file path is read directly.
pub fn load_config(project_path: &Path) -> Result<DepnetConfig, ConfigError> {
    let config_path = if project_path.is_file() {
        Some(project_path.to_path_buf())
    } else {
        find_config_file(project_path)
    };

    match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Reading config");
            let content = fs::read_to_string(&path)?;
            let config: DepnetConfig = toml::from_str(&content)?;
            Ok(config)
        }
        None => Ok(DepnetConfig::default()),
    }
}

/// Find the config file by searching up the directory tree
fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".depnet.toml", "depnet.toml"];

    let mut current = start_path.to_path_buf();

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // Move to parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}

/// Load and compile configuration
pub fn load_compiled_config(project_path: &Path) -> Result<CompiledConfig, ConfigError> {
    let config = load_config(project_path)?;
    CompiledConfig::from_config(config)
}
