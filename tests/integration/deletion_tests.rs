use super::common::{digest, dup, write_file, write_report};
use filetime::FileTime;
use rmlint_manager::actions::{
    CleanupOutcome, DeletionExecutor, DeletionOutcome, ExecutionMode, ExecutorConfig,
    LocalFilesystem, MissingReason,
};
use rmlint_manager::error::ExitCode;
use rmlint_manager::fingerprint::Sha256Fingerprinter;
use rmlint_manager::report::load_report;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn executor_config(root: &Path) -> ExecutorConfig {
    ExecutorConfig::default().with_protected_dirs(vec![root.to_path_buf()])
}

#[test]
fn test_dry_run_then_live_run() {
    let dir = tempdir().unwrap();
    let content = vec![b'x'; 100];
    let original = write_file(dir.path(), "keep/a.txt", &content);
    let first = write_file(dir.path(), "dups/b.txt", &content);
    let second = write_file(dir.path(), "dups/c.txt", &content);
    let checksum = digest(&original);

    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 100, &checksum, true),
            dup(&first, 100, &checksum, false),
            dup(&second, 100, &checksum, false),
        ],
    );
    let index = load_report(&report).unwrap();
    assert_eq!(index.total_reclaimable_bytes(), 200);

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));

    let dry = executor.execute(&index, ExecutionMode::DryRun);
    assert_eq!(dry.summary.would_delete, 2);
    assert_eq!(dry.summary.bytes, 200);
    assert!(first.exists() && second.exists());
    assert_eq!(ExitCode::from_summary(&dry.summary), ExitCode::Success);

    let live = executor.execute(&index, ExecutionMode::Live);
    assert_eq!(live.summary.deleted, 2);
    assert_eq!(live.summary.bytes, 200);
    assert!(original.exists());
    assert!(!first.exists() && !second.exists());
    assert!(!dir.path().join("dups").exists());
    assert!(dir.path().join("keep").exists());

    // the second deletion empties the directory
    assert_eq!(live.items[0].cleanup, CleanupOutcome::Restored);
    assert_eq!(
        live.items[1].cleanup,
        CleanupOutcome::Removed {
            dirs: vec![dir.path().join("dups")]
        }
    );
    assert_eq!(live.summary.removed_dirs, 1);
}

#[test]
fn test_shared_parent_keeps_timestamps() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "orig/data.bin", b"payload");
    let duplicate = write_file(dir.path(), "mixed/data.bin", b"payload");
    write_file(dir.path(), "mixed/unrelated.txt", b"stays");
    let checksum = digest(&original);

    let mixed = dir.path().join("mixed");
    let past = FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_times(&mixed, past, past).unwrap();

    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 7, &checksum, true),
            dup(&duplicate, 7, &checksum, false),
        ],
    );
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));
    let run = executor.execute(&index, ExecutionMode::Live);

    assert_eq!(run.items[0].outcome, DeletionOutcome::Deleted);
    assert_eq!(run.items[0].cleanup, CleanupOutcome::Restored);
    assert!(mixed.join("unrelated.txt").exists());

    let metadata = fs::metadata(&mixed).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&metadata), past);
}

#[test]
fn test_would_delete_count_matches_deleted_count() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "o/f", b"same bytes");
    let good = write_file(dir.path(), "d1/f", b"same bytes");
    let changed = write_file(dir.path(), "d2/f", b"same bytes");
    let checksum = digest(&original);

    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 10, &checksum, true),
            dup(&good, 10, &checksum, false),
            dup(&changed, 10, &checksum, false),
            dup(&dir.path().join("d3/gone"), 10, &checksum, false),
        ],
    );
    fs::write(&changed, b"edited after the scan").unwrap();
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));

    let dry = executor.execute(&index, ExecutionMode::DryRun);
    let live = executor.execute(&index, ExecutionMode::Live);

    assert_eq!(dry.summary.would_delete, live.summary.deleted);
    assert_eq!(live.summary.deleted, 1);
    assert_eq!(live.summary.skipped_mismatch, 1);
    assert_eq!(live.summary.skipped_missing, 1);
    assert!(changed.exists());
    assert_eq!(ExitCode::from_summary(&live.summary), ExitCode::PartialSuccess);
}

#[test]
fn test_missing_duplicate_is_skipped() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "o/f", b"abc");
    let checksum = digest(&original);
    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 3, &checksum, true),
            dup(&dir.path().join("never/created"), 3, &checksum, false),
        ],
    );
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));
    let run = executor.execute(&index, ExecutionMode::Live);

    assert_eq!(
        run.items[0].outcome,
        DeletionOutcome::SkippedMissing {
            reason: MissingReason::FileAbsent
        }
    );
    assert_eq!(run.items[0].cleanup, CleanupOutcome::NotAttempted);
    assert!(original.exists());
}

#[test]
fn test_original_changed_protects_duplicate() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "o/f", b"abc");
    let duplicate = write_file(dir.path(), "d/f", b"abc");
    let checksum = digest(&original);
    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 3, &checksum, true),
            dup(&duplicate, 3, &checksum, false),
        ],
    );
    fs::write(&original, b"abd").unwrap();
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));
    let run = executor.execute(&index, ExecutionMode::Live);

    assert_eq!(
        run.items[0].outcome,
        DeletionOutcome::SkippedMismatch {
            original_matches: false,
            duplicate_matches: true,
        }
    );
    assert!(duplicate.exists());
}

#[test]
fn test_empty_report_is_nothing_to_do() {
    let dir = tempdir().unwrap();
    let report = write_report(dir.path(), Vec::new());
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor = DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, ExecutorConfig::default());
    let run = executor.execute(&index, ExecutionMode::Live);

    assert!(run.items.is_empty());
    assert_eq!(ExitCode::from_summary(&run.summary), ExitCode::NothingToDo);
}

#[test]
fn test_run_serializes_outcomes() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "o/f", b"abc");
    let duplicate = write_file(dir.path(), "d/f", b"abc");
    let checksum = digest(&original);
    let report = write_report(
        dir.path(),
        vec![
            dup(&original, 3, &checksum, true),
            dup(&duplicate, 3, &checksum, false),
        ],
    );
    let index = load_report(&report).unwrap();

    let fs_impl = LocalFilesystem::default();
    let executor =
        DeletionExecutor::new(&Sha256Fingerprinter, &fs_impl, executor_config(dir.path()));
    let run = executor.execute(&index, ExecutionMode::DryRun);

    let value = serde_json::to_value(&run).unwrap();
    assert_eq!(value["items"][0]["outcome"], "would_delete");
    assert_eq!(value["summary"]["would_delete"], 1);
}
