//! Raw report entries as emitted by rmlint's JSON formatter.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Lint type rmlint assigns to members of a duplicate set.
pub const DUPLICATE_FILE: &str = "duplicate_file";

/// Summary tag used for entries that carry no `type` field (header/footer objects).
pub const UNKNOWN_TYPE: &str = "Unknown";

/// A single object from an rmlint JSON report.
///
/// Every field is optional on the wire. A field that is missing, `null` or
/// of the wrong JSON type decodes as `None` and is defaulted by the
/// accessors, so an incomplete entry is skipped later instead of failing
/// the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Lint type tag (`duplicate_file`, `emptydir`, `badlink`, ...).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Absolute path of the file.
    #[serde(
        default,
        deserialize_with = "lenient_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<PathBuf>,
    /// File size in bytes.
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,
    /// Content fingerprint in hex.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub checksum: Option<String>,
    /// Whether rmlint picked this file as the one to keep.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_original: Option<bool>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
    lenient_string(deserializer).map(|path| path.map(PathBuf::from))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

impl ReportEntry {
    /// Build a `duplicate_file` entry.
    #[must_use]
    pub fn duplicate(
        path: impl Into<PathBuf>,
        size: u64,
        checksum: impl Into<String>,
        is_original: bool,
    ) -> Self {
        Self {
            kind: Some(DUPLICATE_FILE.to_string()),
            path: Some(path.into()),
            size: Some(size),
            checksum: Some(checksum.into()),
            is_original: Some(is_original),
        }
    }

    /// Build an entry of an arbitrary lint type with only a path.
    #[must_use]
    pub fn other(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: Some(kind.into()),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Lint type, or [`UNKNOWN_TYPE`] when absent.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(UNKNOWN_TYPE)
    }

    /// Path of the file, empty when absent.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Size in bytes, `0` when absent.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Checksum, empty when absent.
    #[must_use]
    pub fn checksum(&self) -> &str {
        self.checksum.as_deref().unwrap_or("")
    }

    /// Original flag, `false` when absent.
    #[must_use]
    pub fn is_original(&self) -> bool {
        self.is_original.unwrap_or(false)
    }

    /// Whether this entry takes part in duplicate grouping.
    #[must_use]
    pub fn is_duplicate_candidate(&self) -> bool {
        self.kind.as_deref() == Some(DUPLICATE_FILE) && !self.checksum().is_empty()
    }
}
