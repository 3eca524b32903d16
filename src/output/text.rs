//! Plain-text rendering of report queries and deletion results.
//!
//! Sizes use IEC binary units via the `bytesize` crate. Labels are colored
//! with `yansi`; call [`yansi::disable`] for plain output.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::{
    CleanupOutcome, DeletionOutcome, DeletionSummary, ExecutionMode, ItemReport,
};
use crate::report::{ReportEntry, ReportIndex};

/// Format bytes as a human-readable size.
///
/// # Examples
///
/// ```
/// use rmlint_manager::output::text::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert!(format_size(1024 * 1024).contains("MiB"));
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Entry counts per lint type.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary<W: Write>(writer: &mut W, index: &ReportIndex) -> io::Result<()> {
    writeln!(writer, "{}", ">>> Overall Summary:".bold())?;
    if index.summary().is_empty() {
        writeln!(writer, "  (report is empty)")?;
    }
    for (lint_type, count) in index.summary() {
        writeln!(writer, "  - {lint_type:<15}: {count} items")?;
    }
    writeln!(
        writer,
        "  {} duplicate groups, {} files marked for deletion",
        index.group_count(),
        index.duplicate_count()
    )
}

/// Total bytes reclaimable by deleting every duplicate.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_space<W: Write>(writer: &mut W, index: &ReportIndex) -> io::Result<()> {
    writeln!(
        writer,
        "Total space to be freed: {} ({} files)",
        format_size(index.total_reclaimable_bytes()).green(),
        index.duplicate_count()
    )
}

/// One path per line, `N/A` for entries without a path.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_paths<'a, W, I>(writer: &mut W, entries: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ReportEntry>,
{
    for entry in entries {
        if entry.path().as_os_str().is_empty() {
            writeln!(writer, "N/A")?;
        } else {
            writeln!(writer, "{}", entry.path().display())?;
        }
    }
    Ok(())
}

/// Sized table of the largest duplicates.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_top<W: Write>(writer: &mut W, entries: &[&ReportEntry]) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!(">>> Top {} largest files marked for deletion:", entries.len()).bold()
    )?;
    if entries.is_empty() {
        return writeln!(writer, "No duplicates to display.");
    }
    for entry in entries {
        writeln!(
            writer,
            "  {:>10}  {}",
            format_size(entry.size()),
            entry.path().display()
        )?;
    }
    Ok(())
}

/// One status line for a processed item.
#[must_use]
pub fn item_line(item: &ItemReport, total: usize) -> String {
    let position = format!("[{}/{}]", item.index + 1, total);
    let path = item.path.display();
    let status = match &item.outcome {
        DeletionOutcome::Deleted => format!("{} {path}", "DELETED".green()),
        DeletionOutcome::WouldDelete => format!("{} {path}", "WOULD DELETE".cyan()),
        DeletionOutcome::SkippedMissing { reason } => {
            format!("{} {path} ({reason})", "SKIPPED".yellow())
        }
        DeletionOutcome::SkippedMismatch { .. } => format!(
            "{} {path} (checksum mismatch, file may have changed)",
            "SKIPPED".yellow()
        ),
        DeletionOutcome::Error { cause } => format!("{} {cause}", "ERROR".red()),
    };

    match &item.cleanup {
        CleanupOutcome::Removed { dirs } => match dirs.first() {
            Some(dir) => format!(
                "{position} {status}; cleaned empty directory tree starting at {}",
                dir.display()
            ),
            None => format!("{position} {status}"),
        },
        CleanupOutcome::Failed { cause } => {
            format!("{position} {status}; {} {cause}", "cleanup failed:".red())
        }
        CleanupOutcome::NotAttempted | CleanupOutcome::Restored | CleanupOutcome::Kept => {
            format!("{position} {status}")
        }
    }
}

/// Closing summary of a dry run or live deletion.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_deletion_summary<W: Write>(
    writer: &mut W,
    summary: &DeletionSummary,
) -> io::Result<()> {
    let (title, verb) = match summary.mode {
        ExecutionMode::DryRun => ("Dry Run Summary", "would be"),
        ExecutionMode::Live => ("Deletion Summary", "were"),
    };

    writeln!(writer, "-----------------------------------")?;
    writeln!(writer, "{}", format!(">>> {title}:").bold())?;
    writeln!(writer, "  - Files that {verb} deleted: {}", summary.removals())?;
    writeln!(
        writer,
        "  - Total space that {verb} freed: {}",
        format_size(summary.bytes)
    )?;
    writeln!(
        writer,
        "  - Files skipped (hash mismatch): {}",
        summary.skipped_mismatch
    )?;
    writeln!(
        writer,
        "  - Files skipped (missing/other): {}",
        summary.skipped_missing
    )?;
    writeln!(writer, "  - Errors: {}", summary.errors)?;
    if summary.mode == ExecutionMode::Live {
        writeln!(writer, "  - Empty directories removed: {}", summary.removed_dirs)?;
        if summary.cleanup_failures > 0 {
            writeln!(
                writer,
                "  - Directory cleanup failures: {}",
                summary.cleanup_failures
            )?;
        }
    }
    if summary.interrupted {
        writeln!(
            writer,
            "  {} after {} of {} files",
            "Interrupted".yellow(),
            summary.processed,
            summary.total
        )?;
    }
    writeln!(writer, "-----------------------------------")
}
