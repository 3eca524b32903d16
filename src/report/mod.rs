//! rmlint report loading and indexing.
//!
//! This module provides:
//! - [`ReportEntry`]: one permissively decoded object of an rmlint JSON report
//! - [`ReportIndex`]: the checksum grouping of entries into originals and duplicates
//! - [`load_report`] / [`parse_report`]: decoding a report file into an index
//!
//! A failed load never touches an index the caller already holds; the caller
//! simply keeps using the previous one.
//!
//! # Example
//!
//! ```no_run
//! use rmlint_manager::report::load_report;
//! use std::path::Path;
//!
//! let index = load_report(Path::new("rmlint.json")).unwrap();
//! println!("{} duplicates", index.duplicate_count());
//! ```

pub mod entry;
pub mod index;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use entry::{ReportEntry, DUPLICATE_FILE, UNKNOWN_TYPE};
pub use index::{DuplicateGroup, ReportIndex};

/// Errors that can occur while loading a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be read.
    #[error("failed to read report {path}: {source}")]
    Io {
        /// Report path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The report is not valid JSON.
    #[error("report is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("report must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    /// An array element is not a JSON object.
    #[error("report entry {index} must be an object, found {found}")]
    Entry {
        /// Position in the report array
        index: usize,
        /// JSON kind of the element
        found: &'static str,
    },
}

/// Decode report entries from JSON text.
///
/// # Errors
///
/// Returns [`ReportError`] if the text is not a JSON array of objects.
/// Fields of the wrong type inside an object are not errors; they decode
/// as absent.
pub fn parse_entries(content: &str) -> Result<Vec<ReportEntry>, ReportError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => return Err(ReportError::NotAnArray(json_kind(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ReportError::Entry {
                    index,
                    found: json_kind(&item),
                });
            }
            serde_json::from_value::<ReportEntry>(item).map_err(ReportError::from)
        })
        .collect()
}

/// Decode JSON text and build the index.
///
/// # Errors
///
/// See [`parse_entries`].
pub fn parse_report(content: &str) -> Result<ReportIndex, ReportError> {
    parse_entries(content).map(ReportIndex::build)
}

/// Read a report file and build the index.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be read, or a decode error.
pub fn load_report(path: &Path) -> Result<ReportIndex, ReportError> {
    let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let index = parse_report(&content)?;
    log::info!(
        "Loaded report {}: {} entries, {} duplicate groups",
        path.display(),
        index.entry_count(),
        index.group_count()
    );
    Ok(index)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
