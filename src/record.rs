//! Package records and the input validation boundary
//!
//! A record describes one package: its name, the directory it lives in, its
//! size in lines and the ordered list of packages it references. Records are
//! read from a JSON array such as:
//!
//! ```json
//! [
//!   {
//!     "PackageName": "billing",
//!     "DirectoryName": "finance",
//!     "NumberOfLines": 420,
//!     "References": ["ledger", "tax"]
//!   }
//! ]
//! ```
//!
//! `References` may also be an object keyed by package name (as written by
//! older scanners that stored occurrence counts). Keys are taken in document
//! order and the counts are ignored.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read records file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse records: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Record #{index} has an empty PackageName")]
    EmptyPackageName { index: usize },

    #[error("Package '{package}' has an invalid NumberOfLines: {value}")]
    InvalidLineCount { package: String, value: f64 },

    #[error("Package '{0}' appears more than once")]
    DuplicatePackage(String),
}

/// One package's dependency and metadata entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Unique package name
    pub package_name: String,
    /// Directory the package lives in; packages are colored by it
    pub directory_name: String,
    /// Raw size metric
    pub number_of_lines: f64,
    /// Referenced package names, in order of first appearance
    #[serde(deserialize_with = "deserialize_references")]
    pub references: Vec<String>,
}

impl Record {
    pub fn new(
        package_name: impl Into<String>,
        directory_name: impl Into<String>,
        number_of_lines: f64,
        references: Vec<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            directory_name: directory_name.into(),
            number_of_lines,
            references,
        }
    }
}

fn deserialize_references<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ReferencesVisitor;

    impl<'de> Visitor<'de> for ReferencesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an array of package names or an object keyed by package name")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut references = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(name) = seq.next_element::<String>()? {
                references.push(name);
            }
            Ok(references)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut references = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, IgnoredAny)) = map.next_entry::<String, IgnoredAny>()? {
                references.push(name);
            }
            Ok(references)
        }

        // A package with no references may be written as `null`
        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(ReferencesVisitor)
}

/// Parse and validate records from a JSON string
pub fn parse_records(json: &str) -> Result<Vec<Record>, RecordError> {
    let records: Vec<Record> = serde_json::from_str(json)?;
    validate_records(&records)?;
    Ok(records)
}

/// Load and validate records from a JSON file
pub fn load_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let content = fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    tracing::debug!(count = records.len(), path = %path.display(), "Loaded records");
    Ok(records)
}

/// Write records as pretty-printed JSON
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), RecordError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// Check the invariants the graph builder relies on
pub fn validate_records(records: &[Record]) -> Result<(), RecordError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if record.package_name.is_empty() {
            return Err(RecordError::EmptyPackageName { index });
        }
        if !record.number_of_lines.is_finite() || record.number_of_lines < 0.0 {
            return Err(RecordError::InvalidLineCount {
                package: record.package_name.clone(),
                value: record.number_of_lines,
            });
        }
        if !seen.insert(&record.package_name) {
            return Err(RecordError::DuplicatePackage(record.package_name.clone()));
        }
    }

    Ok(())
}
