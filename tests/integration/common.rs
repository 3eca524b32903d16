//! Fixtures shared by the integration tests.

use rmlint_manager::fingerprint::{Fingerprinter, Sha256Fingerprinter};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// SHA-256 of a file, as the report would carry it.
pub fn digest(path: &Path) -> String {
    Sha256Fingerprinter.fingerprint(path).unwrap()
}

/// A `duplicate_file` report object.
pub fn dup(path: &Path, size: u64, checksum: &str, is_original: bool) -> Value {
    json!({
        "type": "duplicate_file",
        "path": path,
        "size": size,
        "checksum": checksum,
        "is_original": is_original,
    })
}

/// Write a report wrapped in rmlint's header and footer objects.
pub fn write_report(dir: &Path, entries: Vec<Value>) -> PathBuf {
    let mut all = vec![json!({"description": "rmlint json-dump of lint files", "cwd": "/"})];
    all.extend(entries);
    all.push(json!({"aborted": false, "total_files": 0}));

    let path = dir.join("rmlint.json");
    fs::write(&path, serde_json::to_string_pretty(&Value::Array(all)).unwrap()).unwrap();
    path
}
