//! Per-item outcomes and the aggregate summary of a deletion run.

use std::path::PathBuf;

use serde::Serialize;

/// Whether a run mutates the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Verify everything, delete nothing.
    DryRun,
    /// Verify and delete.
    Live,
}

impl ExecutionMode {
    /// Whether this is a dry run.
    #[must_use]
    pub fn is_dry_run(self) -> bool {
        self == Self::DryRun
    }
}

/// Why a duplicate was skipped as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// The entry has no path.
    EmptyPath,
    /// The entry has no checksum.
    EmptyChecksum,
    /// Nothing exists at the path any more.
    FileAbsent,
    /// No group or original could be resolved for the checksum.
    GroupUnresolved,
}

impl std::fmt::Display for MissingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "entry has no path"),
            Self::EmptyChecksum => write!(f, "entry has no checksum"),
            Self::FileAbsent => write!(f, "file already deleted"),
            Self::GroupUnresolved => write!(f, "could not find original file in report"),
        }
    }
}

/// What happened to one duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeletionOutcome {
    /// The file was deleted.
    Deleted,
    /// The file passed verification and would be deleted.
    WouldDelete,
    /// The path or its group could not be resolved.
    SkippedMissing {
        /// Which lookup failed
        reason: MissingReason,
    },
    /// A recomputed fingerprint did not match the report.
    SkippedMismatch {
        /// Whether the original still matches
        original_matches: bool,
        /// Whether the duplicate still matches
        duplicate_matches: bool,
    },
    /// A filesystem operation failed; the file was left in place.
    Error {
        /// Rendered cause
        cause: String,
    },
}

impl DeletionOutcome {
    /// Whether the file was (or would be) removed.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Deleted | Self::WouldDelete)
    }
}

/// What happened to the parent directory after a deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "cleanup", rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// No file was deleted, so directories were not touched.
    #[default]
    NotAttempted,
    /// The parent and possibly further ancestors were empty and removed.
    Removed {
        /// Removed directories, innermost first
        dirs: Vec<PathBuf>,
    },
    /// The parent still has entries; its timestamps were restored.
    Restored,
    /// The parent still has entries; timestamp restoration is disabled.
    Kept,
    /// Removing the parent or restoring its timestamps failed.
    Failed {
        /// Rendered cause
        #[serde(rename = "cleanup_cause")]
        cause: String,
    },
}

/// Outcome of one processed duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    /// Position in the index's duplicate order (0-based).
    pub index: usize,
    /// Duplicate path as recorded in the report.
    pub path: PathBuf,
    /// Size recorded in the report.
    pub size: u64,
    /// Result for the file itself.
    #[serde(flatten)]
    pub outcome: DeletionOutcome,
    /// Result for its parent directory.
    #[serde(flatten)]
    pub cleanup: CleanupOutcome,
}

/// Aggregate counts of a deletion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    /// Dry run or live.
    pub mode: ExecutionMode,
    /// Duplicates in the index.
    pub total: usize,
    /// Duplicates actually processed.
    pub processed: usize,
    /// Files deleted.
    pub deleted: usize,
    /// Files that would be deleted.
    pub would_delete: usize,
    /// Files skipped as missing.
    pub skipped_missing: usize,
    /// Files skipped on fingerprint mismatch.
    pub skipped_mismatch: usize,
    /// Files left in place after a filesystem error.
    pub errors: usize,
    /// Bytes freed (live) or that would be freed (dry run).
    pub bytes: u64,
    /// Directories removed during cleanup.
    pub removed_dirs: usize,
    /// Parent directories whose timestamps were restored.
    pub restored_timestamps: usize,
    /// Cleanup steps that failed after a successful deletion.
    pub cleanup_failures: usize,
    /// Whether the run stopped early on a shutdown request.
    pub interrupted: bool,
}

impl DeletionSummary {
    /// Empty summary for a run over `total` duplicates.
    #[must_use]
    pub fn new(mode: ExecutionMode, total: usize) -> Self {
        Self {
            mode,
            total,
            processed: 0,
            deleted: 0,
            would_delete: 0,
            skipped_missing: 0,
            skipped_mismatch: 0,
            errors: 0,
            bytes: 0,
            removed_dirs: 0,
            restored_timestamps: 0,
            cleanup_failures: 0,
            interrupted: false,
        }
    }

    /// Fold one item into the counts.
    pub fn record(&mut self, item: &ItemReport) {
        self.processed += 1;
        match &item.outcome {
            DeletionOutcome::Deleted => {
                self.deleted += 1;
                self.bytes += item.size;
            }
            DeletionOutcome::WouldDelete => {
                self.would_delete += 1;
                self.bytes += item.size;
            }
            DeletionOutcome::SkippedMissing { .. } => self.skipped_missing += 1,
            DeletionOutcome::SkippedMismatch { .. } => self.skipped_mismatch += 1,
            DeletionOutcome::Error { .. } => self.errors += 1,
        }
        match &item.cleanup {
            CleanupOutcome::Removed { dirs } => self.removed_dirs += dirs.len(),
            CleanupOutcome::Restored => self.restored_timestamps += 1,
            CleanupOutcome::Failed { .. } => self.cleanup_failures += 1,
            CleanupOutcome::NotAttempted | CleanupOutcome::Kept => {}
        }
    }

    /// Files deleted or, in a dry run, that would be deleted.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.deleted + self.would_delete
    }

    /// Whether every processed item was removed without any failure.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.skipped_missing == 0
            && self.skipped_mismatch == 0
            && self.errors == 0
            && self.cleanup_failures == 0
    }
}

/// Items plus the summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRun {
    /// Per-item outcomes in processing order.
    pub items: Vec<ItemReport>,
    /// Aggregate counts.
    pub summary: DeletionSummary,
}
