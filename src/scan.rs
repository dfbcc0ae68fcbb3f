//! Source tree scanning
//!
//! Produces package records from a directory of source files. A package is a
//! file; its references are the qualifiers of qualified calls found in it
//! (`billing.charge(` references `billing`). Files are processed in parallel
//! with Rayon.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rayon::prelude::*;
use regex_lite::Regex;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::CompiledConfig;
use crate::record::Record;

/// Errors that can occur while scanning
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid reference pattern: {0}")]
    PatternError(#[from] regex_lite::Error),
}

/// Source languages the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    Python,
    Plsql,
}

impl Language {
    /// Pattern matching a qualified call such as `module.function(`
    pub fn pattern(&self) -> &'static str {
        match self {
            Language::Python => r"\b\w+\s*\.\s*\w+\s*\(",
            Language::Plsql => r"\b([a-zA-Z_][a-zA-Z0-9_]*)\.([a-zA-Z_][a-zA-Z0-9_]*)\s*\(",
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Plsql => "pkb",
        }
    }
}

/// Extracts references from source text
pub struct ReferenceExtractor {
    regex: Regex,
}

impl ReferenceExtractor {
    pub fn new(language: Language) -> Result<Self, ScanError> {
        Ok(Self {
            regex: Regex::new(language.pattern())?,
        })
    }

    /// Qualifiers of all qualified calls, de-duplicated and sorted.
    ///
    /// Edge weight is the position in this list, so the order must match the
    /// records the legacy scanner wrote: unique names in byte order.
    pub fn extract(&self, content: &str) -> Vec<String> {
        self.regex
            .find_iter(content)
            .filter_map(|m| m.as_str().split('.').next())
            .map(str::trim)
            .filter(|qualifier| !qualifier.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// File name up to the first `.`
fn package_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    file_name.split('.').next().unwrap_or("").to_string()
}

/// Name of the directory directly containing `path`
fn directory_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

/// Get all non-hidden files with the language's extension under `dir`, sorted
fn source_files<'a>(
    dir: &'a Path,
    language: Language,
    config: &'a CompiledConfig,
) -> impl Iterator<Item = PathBuf> + 'a {
    let extension = OsStr::new(language.extension());

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(move |entry| {
            let file_path = entry.path();
            let relative = file_path.strip_prefix(dir).unwrap_or(file_path);

            entry.file_type().is_file()
                && file_path.extension() == Some(extension)
                && !relative
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                && !config.should_exclude(&relative.to_string_lossy())
        })
        .map(|e| e.path().to_path_buf())
}

/// Build the record for one source file
pub fn scan_file(path: &Path, extractor: &ReferenceExtractor) -> Result<Record, ScanError> {
    // Legacy sources are not always UTF-8
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    Ok(Record::new(
        package_name(path),
        directory_name(path),
        content.lines().count() as f64,
        extractor.extract(&content),
    ))
}

/// Scan a directory tree and return one record per package.
///
/// Files that cannot be read are logged and skipped. When two files share a
/// package name the first one in path order wins.
pub fn scan_directory(
    dir: &Path,
    language: Language,
    config: &CompiledConfig,
) -> Result<Vec<Record>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::InvalidPath(dir.display().to_string()));
    }

    let extractor = ReferenceExtractor::new(language)?;
    if config.has_exclusions() {
        tracing::debug!("Applying scan exclusions");
    }
    let paths: Vec<PathBuf> = source_files(dir, language, config).collect();
    tracing::debug!(files = paths.len(), threads = rayon::current_num_threads(), "Scanning");

    let scanned: Vec<(PathBuf, Record)> = paths
        .par_iter()
        .filter_map(|path| match scan_file(path, &extractor) {
            Ok(record) => Some((path.clone(), record)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping file");
                None
            }
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(scanned.len());
    for (path, record) in scanned {
        if !seen.insert(record.package_name.clone()) {
            tracing::warn!(
                path = %path.display(),
                package = %record.package_name,
                "Duplicate package name, keeping the first"
            );
            continue;
        }
        records.push(record);
    }

    tracing::info!(packages = records.len(), "Scan complete");
    Ok(records)
}
