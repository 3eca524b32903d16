//! Deletion plan execution.
//!
//! This module provides functionality for:
//! - Verified deletion of report duplicates ([`DeletionExecutor`])
//! - Dry runs that report what a live run would do
//! - Cleanup of directories left empty by a deletion
//! - The filesystem seam the executor works through ([`Filesystem`])
//!
//! # Deletion
//!
//! ```no_run
//! use rmlint_manager::actions::{DeletionExecutor, ExecutionMode, ExecutorConfig, LocalFilesystem};
//! use rmlint_manager::fingerprint::Blake3Fingerprinter;
//! use rmlint_manager::report::ReportIndex;
//!
//! let index = ReportIndex::build(Vec::new());
//! let filesystem = LocalFilesystem::default();
//! let executor = DeletionExecutor::new(&Blake3Fingerprinter, &filesystem, ExecutorConfig::default());
//! let run = executor.execute(&index, ExecutionMode::Live);
//! assert_eq!(run.summary.deleted, 0);
//! ```

pub mod delete;
pub mod fs;
pub mod outcome;

// Re-export commonly used types
pub use delete::{DeletionExecutor, DeletionObserver, ExecutorConfig, NoopObserver};
pub use fs::{DeleteMethod, DirTimes, Filesystem, LocalFilesystem};
pub use outcome::{
    CleanupOutcome, DeletionOutcome, DeletionRun, DeletionSummary, ExecutionMode, ItemReport,
    MissingReason,
};
