//! Reference table cache and CSV export
//!
//! The reference table is the package → references mapping taken from the
//! records, in record order. It is cached on disk so later runs can reuse it,
//! and can be exported as a CSV dependency matrix with one column per
//! package. Only the table is stored; the network graph is always rebuilt.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

/// Errors that can occur when reading or writing the cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access cache: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse cache: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),
}

/// One package and the packages it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceColumn {
    pub package: String,
    pub references: Vec<String>,
}

/// Package references in record order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub columns: Vec<ReferenceColumn>,
}

/// Where a table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Cache,
    Records,
}

impl ReferenceTable {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            columns: records
                .iter()
                .map(|r| ReferenceColumn {
                    package: r.package_name.clone(),
                    references: r.references.clone(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Length of the longest reference list
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.references.len())
            .max()
            .unwrap_or(0)
    }
}

pub fn load_cache(path: &Path) -> Result<ReferenceTable, CacheError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_cache(path: &Path, table: &ReferenceTable) -> Result<(), CacheError> {
    let json = serde_json::to_string(table)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reuse the cached table when present, otherwise build it and refresh the cache.
///
/// `no_cache` forces a rebuild. A cache is never checked against the
/// records it was built from.
pub fn load_or_build(
    records: &[Record],
    cache_path: &Path,
    no_cache: bool,
) -> Result<(ReferenceTable, TableSource), CacheError> {
    if !no_cache && cache_path.exists() {
        tracing::debug!(path = %cache_path.display(), "Using cached reference table");
        return Ok((load_cache(cache_path)?, TableSource::Cache));
    }

    let table = ReferenceTable::from_records(records);
    write_cache(cache_path, &table)?;
    tracing::info!(path = %cache_path.display(), packages = table.columns.len(), "Cache updated");
    Ok((table, TableSource::Records))
}

/// Write the table as CSV: a header of package names, then row `i` holding
/// each package's `i`-th reference (empty when the list is shorter).
pub fn write_csv_to<W: Write>(writer: W, table: &ReferenceTable) -> Result<(), CacheError> {
    let mut wtr = csv::Writer::from_writer(writer);

    if !table.is_empty() {
        wtr.write_record(table.columns.iter().map(|c| c.package.as_str()))?;
        for row in 0..table.row_count() {
            wtr.write_record(
                table
                    .columns
                    .iter()
                    .map(|c| c.references.get(row).map(String::as_str).unwrap_or("")),
            )?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, table: &ReferenceTable) -> Result<(), CacheError> {
    let file = fs::File::create(path)?;
    write_csv_to(file, table)
}
