//! JSON output for report queries and deletion runs.
//!
//! Every query has a small serializable view; deletion runs serialize
//! [`DeletionRun`](crate::actions::DeletionRun) directly.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "entries": 5,
//!   "duplicate_groups": 2,
//!   "duplicate_files": 2,
//!   "reclaimable_bytes": 4196,
//!   "types": { "duplicate_file": 4, "emptydir": 1 }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use rmlint_manager::output::json::{write_json, JsonSummary};
//! use rmlint_manager::report::ReportIndex;
//!
//! let index = ReportIndex::build(Vec::new());
//! let mut out = Vec::new();
//! write_json(&JsonSummary::from_index(&index), &mut out, false).unwrap();
//! assert!(out.starts_with(b"{"));
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::report::{ReportEntry, ReportIndex};

/// Report composition.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Raw entries in the report
    pub entries: usize,
    /// Materialized duplicate groups
    pub duplicate_groups: usize,
    /// Duplicates marked for deletion
    pub duplicate_files: usize,
    /// Sum of duplicate sizes
    pub reclaimable_bytes: u64,
    /// Entry count per lint type
    pub types: BTreeMap<String, usize>,
}

impl JsonSummary {
    /// Build from an index.
    #[must_use]
    pub fn from_index(index: &ReportIndex) -> Self {
        Self {
            entries: index.entry_count(),
            duplicate_groups: index.group_count(),
            duplicate_files: index.duplicate_count(),
            reclaimable_bytes: index.total_reclaimable_bytes(),
            types: index.summary().clone(),
        }
    }
}

/// Reclaimable space.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSpace {
    /// Sum of duplicate sizes
    pub reclaimable_bytes: u64,
    /// Same value in IEC units
    pub reclaimable_human: String,
    /// Duplicates the space is spread over
    pub duplicate_files: usize,
}

impl JsonSpace {
    /// Build from an index.
    #[must_use]
    pub fn from_index(index: &ReportIndex) -> Self {
        let bytes = index.total_reclaimable_bytes();
        Self {
            reclaimable_bytes: bytes,
            reclaimable_human: super::text::format_size(bytes),
            duplicate_files: index.duplicate_count(),
        }
    }
}

/// One report entry.
#[derive(Debug, Clone, Serialize)]
pub struct JsonEntry {
    /// Path as recorded in the report
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Content checksum
    pub checksum: String,
}

impl From<&ReportEntry> for JsonEntry {
    fn from(entry: &ReportEntry) -> Self {
        Self {
            path: entry.path().to_string_lossy().into_owned(),
            size: entry.size(),
            checksum: entry.checksum().to_string(),
        }
    }
}

/// A list of entries (duplicates, originals or the top-N).
#[derive(Debug, Clone, Serialize)]
pub struct JsonEntryList {
    /// What the list holds
    pub kind: &'static str,
    /// Entries in display order
    pub entries: Vec<JsonEntry>,
}

impl JsonEntryList {
    /// Collect entries under a label.
    #[must_use]
    pub fn new<'a, I>(kind: &'static str, entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ReportEntry>,
    {
        Self {
            kind,
            entries: entries.into_iter().map(JsonEntry::from).collect(),
        }
    }
}

/// Serialize `value` to `writer`, followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<T, W>(value: &T, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
