use super::common::{digest, dup, write_file, write_report};
use rmlint_manager::actions::LocalFilesystem;
use rmlint_manager::config::Config;
use rmlint_manager::fingerprint::Sha256Fingerprinter;
use rmlint_manager::menu::{Menu, MenuState, Pager};
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

fn session(config: &Config, state: &mut MenuState, input: String) -> String {
    let filesystem = LocalFilesystem::default();
    let menu = Menu::new(config, &Sha256Fingerprinter, &filesystem)
        .with_pager(Pager::Direct)
        .with_quiet(true);

    let mut reader = Cursor::new(input);
    let mut out = Vec::new();
    menu.run(state, &mut reader, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_full_session_load_review_delete() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "photos/img.jpg", b"jpeg bytes");
    let duplicate = write_file(dir.path(), "backup/img.jpg", b"jpeg bytes");
    let checksum = digest(&original);
    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 10, &checksum, true),
            dup(&duplicate, 10, &checksum, false),
        ],
    );

    let config = Config {
        top_n: 3,
        ..Config::default()
    };
    let mut state = MenuState::new();
    let input = format!("l\n{}\n3\n5\n6\n7\ny\nq\n", report.display());
    let out = session(&config, &mut state, input);

    assert!(out.contains("Loaded 4 entries: 1 duplicates in 1 groups."));
    assert!(out.contains("Show Top 3 BIGGEST Files"));
    assert!(out.contains(&duplicate.display().to_string()));
    assert!(out.contains("Files that would be deleted: 1"));
    assert!(out.contains("Are you sure you want to delete 1 files"));
    assert!(out.contains("Files that were deleted: 1"));
    assert!(out.contains("Exiting."));

    assert!(original.exists());
    assert!(!duplicate.exists());
    assert!(!dir.path().join("backup").exists());
}

#[test]
fn test_bad_reload_keeps_loaded_report() {
    let dir = tempdir().unwrap();
    let report = write_report(
        dir.path(),
        vec![
            dup(Path::new("/m/a"), 1, "aa", true),
            dup(Path::new("/m/b"), 1, "aa", false),
        ],
    );

    let mut state = MenuState::new();
    let input = format!(
        "l\n{}\nl\n{}\nq\n",
        report.display(),
        dir.path().join("missing.json").display()
    );
    let out = session(&Config::default(), &mut state, input);

    assert!(out.contains("Error:"));
    assert_eq!(state.report_path(), Some(report.as_path()));
    assert_eq!(state.index().unwrap().duplicate_count(), 1);
}

#[test]
fn test_declined_delete_keeps_files() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "a/f", b"same");
    let duplicate = write_file(dir.path(), "b/f", b"same");
    let checksum = digest(&original);
    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 4, &checksum, true),
            dup(&duplicate, 4, &checksum, false),
        ],
    );

    let mut state = MenuState::new();
    let input = format!("l\n{}\n7\nn\nq\n", report.display());
    let out = session(&Config::default(), &mut state, input);

    assert!(out.contains("Deletion cancelled."));
    assert!(duplicate.exists());
}
