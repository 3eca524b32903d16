use super::common::{dup, write_report};
use rmlint_manager::report::{load_report, ReportError, UNKNOWN_TYPE};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_load_report_with_header_and_footer() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            dup(Path::new("/data/a"), 100, "abc", true),
            dup(Path::new("/data/b"), 100, "abc", false),
            dup(Path::new("/data/c"), 100, "abc", false),
            json!({"type": "emptydir", "path": "/data/empty"}),
        ],
    );

    let index = load_report(&report).unwrap();

    assert_eq!(index.entry_count(), 6);
    assert_eq!(index.group_count(), 1);
    assert_eq!(index.duplicate_count(), 2);
    assert_eq!(index.total_reclaimable_bytes(), 200);
    assert_eq!(index.summary().get("duplicate_file"), Some(&3));
    assert_eq!(index.summary().get("emptydir"), Some(&1));
    assert_eq!(index.summary().get(UNKNOWN_TYPE), Some(&2));
}

#[test]
fn test_groups_keep_first_seen_order() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            dup(Path::new("/x/2"), 5, "second", false),
            dup(Path::new("/x/1"), 5, "first", true),
            dup(Path::new("/x/3"), 5, "second", true),
            dup(Path::new("/x/4"), 5, "first", false),
        ],
    );

    let index = load_report(&report).unwrap();
    let order: Vec<&str> = index.groups().iter().map(|g| g.checksum.as_str()).collect();

    assert_eq!(order, vec!["second", "first"]);
    assert_eq!(index.group("first").unwrap().original.path(), Path::new("/x/1"));
}

#[test]
fn test_group_without_original_is_dropped() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            dup(Path::new("/x/a"), 5, "orphan", false),
            dup(Path::new("/x/b"), 5, "orphan", false),
        ],
    );

    let index = load_report(&report).unwrap();

    assert!(index.is_empty());
    assert_eq!(index.duplicate_count(), 0);
    assert_eq!(index.summary().get("duplicate_file"), Some(&2));
}

#[test]
fn test_entries_without_checksum_are_not_grouped() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            json!({"type": "duplicate_file", "path": "/x/a", "size": 3, "is_original": true}),
            json!({"type": "duplicate_file", "path": "/x/b", "size": 3, "checksum": ""}),
        ],
    );

    let index = load_report(&report).unwrap();
    assert_eq!(index.group_count(), 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_report(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[test]
fn test_invalid_json_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"type\": ").unwrap();

    assert!(matches!(load_report(&path), Err(ReportError::Json(_))));
}

#[test]
fn test_object_report_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("object.json");
    fs::write(&path, r#"{"type": "duplicate_file"}"#).unwrap();

    let err = load_report(&path).unwrap_err();
    assert!(matches!(err, ReportError::NotAnArray(_)));
    assert!(err.to_string().contains("JSON array"));
}

#[test]
fn test_mistyped_fields_load_as_defaults() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            json!({"type": "emptydir", "path": "/data/empty", "size": "n/a"}),
            json!({
                "type": "duplicate_file",
                "path": "/data/x",
                "size": -1,
                "checksum": "fff",
                "is_original": "true"
            }),
            dup(Path::new("/data/a"), 100, "abc", true),
            dup(Path::new("/data/b"), 100, "abc", false),
        ],
    );

    let index = load_report(&report).unwrap();

    assert_eq!(index.entry_count(), 6);
    // The "fff" entry has no usable original flag, so its group is dropped.
    assert_eq!(index.group_count(), 1);
    assert_eq!(index.total_reclaimable_bytes(), 100);
    assert_eq!(index.summary().get("emptydir"), Some(&1));
    assert_eq!(index.summary().get("duplicate_file"), Some(&3));
}

#[test]
fn test_non_object_entry_reports_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    fs::write(&path, r#"[{}, "duplicate_file"]"#).unwrap();

    match load_report(&path) {
        Err(ReportError::Entry { index, found }) => {
            assert_eq!(index, 1);
            assert_eq!(found, "a string");
        }
        other => panic!("Expected Entry error, got {:?}", other),
    }
}

#[test]
fn test_top_n_is_sorted_by_size() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            dup(Path::new("/s/o1"), 10, "small", true),
            dup(Path::new("/s/d1"), 10, "small", false),
            dup(Path::new("/b/o2"), 500, "big", true),
            dup(Path::new("/b/d2"), 500, "big", false),
            dup(Path::new("/b/d3"), 500, "big", false),
        ],
    );

    let index = load_report(&report).unwrap();
    let top = index.top_n_by_size(2);

    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|e| e.size() == 500));
    assert_eq!(index.top_n_by_size(100).len(), 3);
    assert!(index.top_n_by_size(0).is_empty());
}
