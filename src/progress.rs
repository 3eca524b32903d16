//! Progress reporting for deletion runs using indicatif.
//!
//! [`DeletionProgress`] implements [`DeletionObserver`] and shows a single
//! bar over the duplicates of a run, printing one status line per item
//! above it.
//!
//! # Quiet Mode
//!
//! When quiet, nothing is drawn and no item lines are printed; the caller
//! still prints the closing summary.

use std::path::Path;
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::actions::{DeletionObserver, DeletionSummary, ExecutionMode, ItemReport};
use crate::output::text::item_line;

/// Longest path shown in the bar message.
const MESSAGE_PATH_LEN: usize = 40;

/// Progress reporter for the deletion outcome stream.
pub struct DeletionProgress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
    item_lines: bool,
}

impl DeletionProgress {
    /// Create a new progress reporter.
    ///
    /// # Examples
    ///
    /// ```
    /// use rmlint_manager::progress::DeletionProgress;
    ///
    /// let progress = DeletionProgress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
            item_lines: true,
        }
    }

    /// Enable or disable the per-item status lines.
    #[must_use]
    pub fn with_item_lines(mut self, enabled: bool) -> Self {
        self.item_lines = enabled;
        self
    }

    /// Whether output is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn style(mode: ExecutionMode) -> ProgressStyle {
        let template = if mode.is_dry_run() {
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}"
        } else {
            "[{elapsed_precise}] [{bar:40.red/blue}] {pos}/{len} ({percent}%) {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl DeletionObserver for DeletionProgress {
    fn on_start(&self, mode: ExecutionMode, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style(mode));
        pb.set_message(if mode.is_dry_run() {
            "Verifying"
        } else {
            "Deleting"
        });
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_item_start(&self, _index: usize, _total: usize, path: &Path) {
        if self.quiet {
            return;
        }
        let message = truncate_path(&path.to_string_lossy(), MESSAGE_PATH_LEN);
        self.with_bar(|pb| pb.set_message(message));
    }

    fn on_item(&self, item: &ItemReport, total: usize) {
        if self.quiet {
            return;
        }
        let line = self.item_lines.then(|| item_line(item, total));
        self.with_bar(|pb| {
            if let Some(line) = line {
                // a hidden bar drops println output
                if pb.is_hidden() {
                    println!("{line}");
                } else {
                    pb.println(line);
                }
            }
            pb.inc(1);
        });
    }

    fn on_complete(&self, _summary: &DeletionSummary) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
///
/// Keeps the file name, or its tail when the name alone is too long.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = file_name.chars().skip(name_len.saturating_sub(keep)).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
