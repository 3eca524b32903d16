//! Scans against a stand-in rmlint that writes a fixed report.

#![cfg(unix)]

use rmlint_manager::actions::LocalFilesystem;
use rmlint_manager::config::{Config, ScanConfig};
use rmlint_manager::fingerprint::Sha256Fingerprinter;
use rmlint_manager::menu::{Menu, MenuState, Pager};
use rmlint_manager::report::load_report;
use rmlint_manager::scan::ScanError;
use std::fs;
use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FAKE_REPORT: &str = r#"[{"description": "fake"},
{"type": "duplicate_file", "path": "/data/a", "size": 64, "checksum": "ff", "is_original": true},
{"type": "duplicate_file", "path": "/data/b", "size": 64, "checksum": "ff", "is_original": false},
{"aborted": false}]"#;

/// Write an executable script that saves the report at its `json:` output.
fn fake_rmlint(dir: &Path) -> PathBuf {
    let report = dir.join("fixture.json");
    fs::write(&report, FAKE_REPORT).unwrap();

    let script = dir.join("fake-rmlint");
    let body = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do\n  case \"$arg\" in\n    json:*) cp '{}' \"${{arg#json:}}\" ;;\n  esac\ndone\n",
        report.display()
    );
    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn scan_config(dir: &Path) -> ScanConfig {
    ScanConfig {
        program: fake_rmlint(dir).to_string_lossy().into_owned(),
        extra_args: Vec::new(),
        output_dir: Some(dir.join("reports")),
    }
}

#[test]
fn test_scan_writes_and_returns_report() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();

    let request = scan_config(dir.path()).request(&[root]).unwrap();
    let report = request.run().unwrap();

    assert!(report.starts_with(dir.path().join("reports")));
    assert!(report
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("rmlint_"));

    let index = load_report(&report).unwrap();
    assert_eq!(index.duplicate_count(), 1);
    assert_eq!(index.total_reclaimable_bytes(), 64);
}

#[test]
fn test_scan_skips_file_roots() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();

    let request = scan_config(dir.path())
        .request(&[file, dir.path().join("missing"), root.clone()])
        .unwrap();
    assert_eq!(request.roots(), &[root]);
}

#[test]
fn test_scan_without_directories_is_rejected() {
    let dir = tempdir().unwrap();
    let err = scan_config(dir.path())
        .request(&[dir.path().join("missing")])
        .unwrap_err();
    assert!(matches!(err, ScanError::NoValidRoots));
}

#[test]
fn test_menu_scan_loads_new_report() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();

    let config = Config {
        scan: scan_config(dir.path()),
        ..Config::default()
    };
    let filesystem = LocalFilesystem::default();
    let menu = Menu::new(&config, &Sha256Fingerprinter, &filesystem)
        .with_pager(Pager::Direct)
        .with_quiet(true);

    let mut state = MenuState::new();
    let mut input = Cursor::new(format!("s\n{}\ny\n2\nq\n", root.display()));
    let mut out = Vec::new();
    menu.run(&mut state, &mut input, &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("About to run the following command:"));
    assert!(out.contains("Scan complete."));
    assert!(out.contains("Loaded 4 entries: 1 duplicates in 1 groups."));
    assert!(out.contains("Total space to be freed:"));
    assert!(out.contains("64 B"));
    assert!(state.report_path().is_some());
}

#[test]
fn test_menu_scan_declined_runs_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();

    let config = Config {
        scan: scan_config(dir.path()),
        ..Config::default()
    };
    let filesystem = LocalFilesystem::default();
    let menu = Menu::new(&config, &Sha256Fingerprinter, &filesystem).with_pager(Pager::Direct);

    let mut state = MenuState::new();
    let mut input = Cursor::new(format!("s\n{}\nn\nq\n", root.display()));
    let mut out = Vec::new();
    menu.run(&mut state, &mut input, &mut out).unwrap();

    assert!(String::from_utf8(out).unwrap().contains("Scan cancelled."));
    assert!(state.index().is_none());
    assert!(!dir.path().join("reports").exists());
}
