//! Verified execution of a deletion plan.
//!
//! # Overview
//!
//! [`DeletionExecutor`] walks the duplicates of a [`ReportIndex`] in order,
//! one at a time, and for each one:
//!
//! 1. skips it if its path or checksum is empty or the file is gone
//! 2. resolves its group's original
//! 3. recomputes the fingerprint of both the original and the duplicate
//! 4. skips it unless both still match the checksum in the report
//! 5. captures the parent directory's timestamps, then deletes the file
//!    (live) or only counts it (dry run)
//! 6. removes the parent and any ancestors that became empty
//! 7. restores the parent's timestamps when it still has entries
//!
//! Every per-item failure is recorded and the batch moves on; nothing short
//! of a shutdown request stops it early.
//!
//! # Safety
//!
//! The fingerprint check in step 4 is the only guard against acting on a
//! stale report. A file is either fully deleted or reported untouched.
//!
//! # Example
//!
//! ```no_run
//! use rmlint_manager::actions::{DeletionExecutor, ExecutionMode, ExecutorConfig, LocalFilesystem};
//! use rmlint_manager::fingerprint::CommandFingerprinter;
//! use rmlint_manager::report::load_report;
//! use std::path::Path;
//!
//! let index = load_report(Path::new("rmlint.json")).unwrap();
//! let fingerprinter = CommandFingerprinter::b2sum();
//! let filesystem = LocalFilesystem::default();
//! let executor = DeletionExecutor::new(&fingerprinter, &filesystem, ExecutorConfig::default());
//!
//! let run = executor.execute(&index, ExecutionMode::DryRun);
//! println!("{} files would be deleted", run.summary.would_delete);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::fs::{is_not_empty, DirTimes, Filesystem};
use super::outcome::{
    CleanupOutcome, DeletionOutcome, DeletionRun, DeletionSummary, ExecutionMode, ItemReport,
    MissingReason,
};
use crate::fingerprint::Fingerprinter;
use crate::report::{ReportEntry, ReportIndex};

/// Configuration for a deletion run.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Remove parent directories that become empty after a deletion.
    pub cleanup_empty_dirs: bool,
    /// Restore the timestamps of parent directories that keep entries.
    pub restore_timestamps: bool,
    /// Directories that are never removed, and where upward cleanup stops.
    pub protected_dirs: Vec<PathBuf>,
    /// Checked before each item; set by the Ctrl+C handler.
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            cleanup_empty_dirs: true,
            restore_timestamps: true,
            protected_dirs: Vec::new(),
            shutdown_flag: None,
        }
    }
}

impl ExecutorConfig {
    /// Enable/disable empty directory cleanup.
    #[must_use]
    pub fn with_cleanup_empty_dirs(mut self, cleanup: bool) -> Self {
        self.cleanup_empty_dirs = cleanup;
        self
    }

    /// Enable/disable timestamp restoration.
    #[must_use]
    pub fn with_restore_timestamps(mut self, restore: bool) -> Self {
        self.restore_timestamps = restore;
        self
    }

    /// Set the protected directories.
    #[must_use]
    pub fn with_protected_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.protected_dirs = dirs;
        self
    }

    /// Attach a shutdown flag for cancellation between items.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Receives the outcome stream of a run as it happens.
pub trait DeletionObserver {
    /// Called once before the first item.
    fn on_start(&self, mode: ExecutionMode, total: usize);

    /// Called before an item is verified.
    fn on_item_start(&self, _index: usize, _total: usize, _path: &Path) {}

    /// Called after an item is processed.
    fn on_item(&self, item: &ItemReport, total: usize);

    /// Called once after the last processed item.
    fn on_complete(&self, summary: &DeletionSummary);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DeletionObserver for NoopObserver {
    fn on_start(&self, _mode: ExecutionMode, _total: usize) {}
    fn on_item(&self, _item: &ItemReport, _total: usize) {}
    fn on_complete(&self, _summary: &DeletionSummary) {}
}

/// Sequential, verifying deletion executor.
pub struct DeletionExecutor<'a> {
    fingerprinter: &'a dyn Fingerprinter,
    filesystem: &'a dyn Filesystem,
    config: ExecutorConfig,
}

impl<'a> DeletionExecutor<'a> {
    /// Create an executor over the given collaborators.
    #[must_use]
    pub fn new(
        fingerprinter: &'a dyn Fingerprinter,
        filesystem: &'a dyn Filesystem,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            fingerprinter,
            filesystem,
            config,
        }
    }

    /// Run over every duplicate in `index`.
    #[must_use]
    pub fn execute(&self, index: &ReportIndex, mode: ExecutionMode) -> DeletionRun {
        self.execute_observed(index, mode, &NoopObserver)
    }

    /// Run over every duplicate in `index`, reporting each item to `observer`.
    pub fn execute_observed(
        &self,
        index: &ReportIndex,
        mode: ExecutionMode,
        observer: &dyn DeletionObserver,
    ) -> DeletionRun {
        let total = index.duplicate_count();
        let mut summary = DeletionSummary::new(mode, total);
        let mut items = Vec::with_capacity(total);

        log::info!(
            "Starting {} over {} duplicates",
            if mode.is_dry_run() { "dry run" } else { "deletion" },
            total
        );
        observer.on_start(mode, total);

        for (i, duplicate) in index.duplicates().enumerate() {
            if self.config.is_shutdown_requested() {
                log::info!("Deletion interrupted after {} of {} items", i, total);
                summary.interrupted = true;
                break;
            }

            observer.on_item_start(i, total, duplicate.path());
            let item = self.process(index, i, duplicate, mode);
            summary.record(&item);
            observer.on_item(&item, total);
            items.push(item);
        }

        log::info!(
            "Finished: {} removed, {} missing, {} mismatched, {} errors, {} bytes",
            summary.removals(),
            summary.skipped_missing,
            summary.skipped_mismatch,
            summary.errors,
            summary.bytes
        );
        observer.on_complete(&summary);

        DeletionRun { items, summary }
    }

    fn process(
        &self,
        index: &ReportIndex,
        position: usize,
        duplicate: &ReportEntry,
        mode: ExecutionMode,
    ) -> ItemReport {
        let path = duplicate.path();
        let (outcome, cleanup) = match self.verify_and_remove(index, duplicate, mode) {
            Ok(result) => result,
            Err(outcome) => (outcome, CleanupOutcome::NotAttempted),
        };

        ItemReport {
            index: position,
            path: path.to_path_buf(),
            size: duplicate.size(),
            outcome,
            cleanup,
        }
    }

    fn verify_and_remove(
        &self,
        index: &ReportIndex,
        duplicate: &ReportEntry,
        mode: ExecutionMode,
    ) -> Result<(DeletionOutcome, CleanupOutcome), DeletionOutcome> {
        let path = duplicate.path();
        let checksum = duplicate.checksum();

        if path.as_os_str().is_empty() {
            return Err(missing(MissingReason::EmptyPath));
        }
        if checksum.is_empty() {
            return Err(missing(MissingReason::EmptyChecksum));
        }
        if !self.filesystem.exists(path) {
            log::info!("Skipping {}: file already deleted", path.display());
            return Err(missing(MissingReason::FileAbsent));
        }

        let original = index
            .group(checksum)
            .map(|group| group.original.path())
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                log::warn!("Skipping {}: no original found for its checksum", path.display());
                missing(MissingReason::GroupUnresolved)
            })?;

        log::debug!("Verifying {} against original {}", path.display(), original.display());
        let original_matches = self.matches(original, checksum);
        let duplicate_matches = self.matches(path, checksum);
        if !(original_matches && duplicate_matches) {
            log::warn!(
                "Checksum mismatch for {} (original ok: {}, duplicate ok: {}), skipping",
                path.display(),
                original_matches,
                duplicate_matches
            );
            return Err(DeletionOutcome::SkippedMismatch {
                original_matches,
                duplicate_matches,
            });
        }

        let parent = parent_dir(path);
        let times = self.filesystem.dir_times(&parent).map_err(|e| {
            log::error!("Cannot read timestamps of {}: {}", parent.display(), e);
            DeletionOutcome::Error {
                cause: format!("cannot read timestamps of {}: {}", parent.display(), e),
            }
        })?;

        if mode.is_dry_run() {
            log::debug!("[dry run] Would delete {}", path.display());
            return Ok((DeletionOutcome::WouldDelete, CleanupOutcome::NotAttempted));
        }

        self.filesystem.remove_file(path).map_err(|e| {
            log::error!("Failed to delete {}: {}", path.display(), e);
            DeletionOutcome::Error {
                cause: format!("failed to delete {}: {}", path.display(), e),
            }
        })?;
        log::info!("Deleted {} ({} bytes)", path.display(), duplicate.size());

        Ok((DeletionOutcome::Deleted, self.cleanup(&parent, times)))
    }

    fn matches(&self, path: &Path, checksum: &str) -> bool {
        match self.fingerprinter.fingerprint(path) {
            Ok(digest) => digest.eq_ignore_ascii_case(checksum),
            Err(e) => {
                log::debug!("Fingerprint failed for {}: {}", path.display(), e);
                false
            }
        }
    }

    fn cleanup(&self, parent: &Path, times: DirTimes) -> CleanupOutcome {
        if !self.config.cleanup_empty_dirs || self.is_protected(parent) {
            return self.restore(parent, times);
        }

        match self.filesystem.remove_dir(parent) {
            Ok(()) => {
                log::info!("Removed empty directory {}", parent.display());
                let mut dirs = vec![parent.to_path_buf()];
                dirs.extend(self.remove_empty_ancestors(parent));
                CleanupOutcome::Removed { dirs }
            }
            Err(e) if is_not_empty(&e) => self.restore(parent, times),
            Err(e) => {
                log::warn!("Failed to remove directory {}: {}", parent.display(), e);
                let cause = format!("failed to remove {}: {}", parent.display(), e);
                match self.restore(parent, times) {
                    CleanupOutcome::Failed { cause: restore } => CleanupOutcome::Failed {
                        cause: format!("{cause}; {restore}"),
                    },
                    _ => CleanupOutcome::Failed { cause },
                }
            }
        }
    }

    /// Remove ancestors of an already removed directory until one is
    /// non-empty, protected, or the filesystem root.
    fn remove_empty_ancestors(&self, removed: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        let mut current = removed.parent();

        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || dir.parent().is_none() || self.is_protected(dir) {
                break;
            }
            if let Err(e) = self.filesystem.remove_dir(dir) {
                if !is_not_empty(&e) {
                    log::debug!("Stopping cleanup at {}: {}", dir.display(), e);
                }
                break;
            }
            log::info!("Removed empty directory {}", dir.display());
            dirs.push(dir.to_path_buf());
            current = dir.parent();
        }

        dirs
    }

    fn restore(&self, parent: &Path, times: DirTimes) -> CleanupOutcome {
        if !self.config.restore_timestamps {
            return CleanupOutcome::Kept;
        }

        match self.filesystem.set_dir_times(parent, times) {
            Ok(()) => {
                log::debug!("Restored timestamps on {}", parent.display());
                CleanupOutcome::Restored
            }
            Err(e) => {
                log::warn!("Failed to restore timestamps on {}: {}", parent.display(), e);
                CleanupOutcome::Failed {
                    cause: format!("failed to restore timestamps on {}: {}", parent.display(), e),
                }
            }
        }
    }

    fn is_protected(&self, dir: &Path) -> bool {
        self.config.protected_dirs.iter().any(|p| p == dir)
    }
}

fn missing(reason: MissingReason) -> DeletionOutcome {
    DeletionOutcome::SkippedMissing { reason }
}

/// Parent directory of `path`, `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
