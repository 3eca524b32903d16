//! Line-oriented interactive menu.
//!
//! The menu owns no global state: the loaded report lives in an explicit
//! [`MenuState`] the caller passes in, and all I/O goes through the reader
//! and writer given to [`Menu::run`].
//!
//! # Actions
//!
//! | Key | Action                                   |
//! |-----|------------------------------------------|
//! | `s` | run a new rmlint scan and load its report |
//! | `l` | load an existing report                  |
//! | `1` | entry counts per lint type               |
//! | `2` | total space to be freed                  |
//! | `3` | list duplicates (paged)                  |
//! | `4` | list originals (paged)                   |
//! | `5` | largest duplicates                       |
//! | `6` | dry run                                  |
//! | `7` | live deletion, after confirmation        |
//! | `q` | quit                                     |

pub mod prompt;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use yansi::Paint;

use crate::actions::{DeletionExecutor, DeletionSummary, ExecutionMode, Filesystem};
use crate::config::Config;
use crate::fingerprint::Fingerprinter;
use crate::output::text;
use crate::progress::DeletionProgress;
use crate::report::{load_report, ReportEntry, ReportError, ReportIndex};
use crate::signal::ShutdownHandler;

pub use prompt::{prompt_confirm, prompt_line, read_line, Pager};

const RULE: &str = "-----------------------------------";

/// The report currently loaded in the menu.
#[derive(Debug, Default)]
pub struct MenuState {
    report_path: Option<PathBuf>,
    index: Option<ReportIndex>,
}

impl MenuState {
    /// Nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, replacing the current report.
    ///
    /// On failure the previous report stays loaded.
    ///
    /// # Errors
    ///
    /// Returns the [`ReportError`] from loading.
    pub fn load(&mut self, path: &Path) -> Result<&ReportIndex, ReportError> {
        let index = load_report(path)?;
        self.report_path = Some(path.to_path_buf());
        Ok(self.index.insert(index))
    }

    /// Path of the loaded report.
    #[must_use]
    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    /// The loaded index.
    #[must_use]
    pub fn index(&self) -> Option<&ReportIndex> {
        self.index.as_ref()
    }
}

/// The interactive menu and its collaborators.
pub struct Menu<'a> {
    config: &'a Config,
    fingerprinter: &'a dyn Fingerprinter,
    filesystem: &'a dyn Filesystem,
    pager: Pager,
    shutdown: Option<ShutdownHandler>,
    quiet: bool,
}

impl<'a> Menu<'a> {
    /// Create a menu over the given configuration and collaborators.
    #[must_use]
    pub fn new(
        config: &'a Config,
        fingerprinter: &'a dyn Fingerprinter,
        filesystem: &'a dyn Filesystem,
    ) -> Self {
        Self {
            config,
            fingerprinter,
            filesystem,
            pager: Pager::from_env(),
            shutdown: None,
            quiet: false,
        }
    }

    /// Use `pager` for long lists.
    #[must_use]
    pub fn with_pager(mut self, pager: Pager) -> Self {
        self.pager = pager;
        self
    }

    /// Let Ctrl+C stop deletion runs between files.
    #[must_use]
    pub fn with_shutdown(mut self, handler: ShutdownHandler) -> Self {
        self.shutdown = Some(handler);
        self
    }

    /// Hide progress bars and per-file lines.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(
        &self,
        state: &mut MenuState,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        loop {
            self.show_menu(state, writer)?;
            let Some(choice) = prompt_line(reader, writer, "Enter your choice: ")? else {
                writeln!(writer)?;
                break;
            };
            writeln!(writer, "{RULE}")?;

            match choice.trim().to_ascii_lowercase().as_str() {
                "q" => break,
                "s" => self.scan(state, reader, writer)?,
                "l" => self.load(state, reader, writer)?,
                other => match state.index() {
                    Some(index) => self.view(other, index, reader, writer)?,
                    None => writeln!(writer, "No report loaded. Run a scan (s) or load one (l).")?,
                },
            }
        }

        writeln!(writer, "Exiting.")
    }

    fn show_menu<W: Write>(&self, state: &MenuState, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "--- rmlint Manager ---".bold())?;
        match state.report_path() {
            Some(path) => writeln!(writer, "Loaded Report: {}", path.display())?,
            None => writeln!(writer, "No report loaded.")?,
        }
        writeln!(writer, "{RULE}")?;
        writeln!(writer, "\n--- Main Menu ---")?;
        writeln!(writer, "  s. Run a new rmlint scan")?;
        writeln!(writer, "  l. Load an existing rmlint.json file")?;

        if state.index().is_some() {
            writeln!(writer, "\n--- Views & Actions (on loaded report) ---")?;
            writeln!(writer, "  1. Overall Summary")?;
            writeln!(writer, "  2. Calculate Total Space to be Freed")?;
            writeln!(writer, "  3. List ALL Files Marked for Deletion")?;
            writeln!(writer, "  4. List ALL Files Marked as Originals")?;
            writeln!(
                writer,
                "  5. Show Top {} BIGGEST Files to be Deleted",
                self.config.top_n
            )?;
            writeln!(writer, "  6. [SAFE] Perform a DRY RUN of the deletion plan")?;
            writeln!(writer, "  7. [ACTION] Execute Deletion Plan")?;
        }

        writeln!(writer, "\n  q. Quit\n")
    }

    fn view<R: BufRead, W: Write>(
        &self,
        choice: &str,
        index: &ReportIndex,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        match choice {
            "1" => text::write_summary(writer, index),
            "2" => text::write_space(writer, index),
            "3" => {
                writeln!(writer, ">>> Files marked for deletion:")?;
                self.page_entries(index.duplicates(), writer)
            }
            "4" => {
                writeln!(writer, ">>> Original files:")?;
                self.page_entries(index.originals(), writer)
            }
            "5" => text::write_top(writer, &index.top_n_by_size(self.config.top_n)),
            "6" => {
                writeln!(writer, ">>> Performing a DRY RUN. No files will be deleted.")?;
                self.execute(index, ExecutionMode::DryRun, writer).map(|_| ())
            }
            "7" => {
                let method = self.config.delete.method;
                writeln!(
                    writer,
                    ">>> This will delete all files marked as duplicates ({method})."
                )?;
                let question = format!(
                    "Are you sure you want to delete {} files ({})?",
                    index.duplicate_count(),
                    text::format_size(index.total_reclaimable_bytes())
                );
                if prompt_confirm(reader, writer, &question)? {
                    self.execute(index, ExecutionMode::Live, writer).map(|_| ())
                } else {
                    writeln!(writer, "Deletion cancelled.")
                }
            }
            _ => writeln!(writer, "Invalid choice."),
        }
    }

    fn page_entries<'e, W, I>(&self, entries: I, writer: &mut W) -> io::Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'e ReportEntry>,
    {
        let mut buf = Vec::new();
        text::write_paths(&mut buf, entries)?;
        if buf.is_empty() {
            return writeln!(writer, "Nothing to list.");
        }
        self.pager.show(&String::from_utf8_lossy(&buf), writer)
    }

    /// Run the executor over `index` and print its summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the summary fails.
    pub fn execute<W: Write>(
        &self,
        index: &ReportIndex,
        mode: ExecutionMode,
        writer: &mut W,
    ) -> io::Result<DeletionSummary> {
        let mut config = self.config.delete.executor_config();
        if let Some(ref handler) = self.shutdown {
            handler.reset();
            config = config.with_shutdown_flag(handler.get_flag());
        }

        let executor = DeletionExecutor::new(self.fingerprinter, self.filesystem, config);
        let progress = DeletionProgress::new(self.quiet);
        let run = executor.execute_observed(index, mode, &progress);

        text::write_deletion_summary(writer, &run.summary)?;
        Ok(run.summary)
    }

    fn load<R: BufRead, W: Write>(
        &self,
        state: &mut MenuState,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        let Some(input) = prompt_line(reader, writer, "Enter path to rmlint.json file: ")? else {
            return Ok(());
        };
        let path = PathBuf::from(input.trim());
        if path.as_os_str().is_empty() {
            return writeln!(writer, "No path given.");
        }
        self.load_into(state, &path, writer)
    }

    fn load_into<W: Write>(
        &self,
        state: &mut MenuState,
        path: &Path,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer, "Loading {}...", path.display())?;
        match state.load(path) {
            Ok(index) => writeln!(
                writer,
                "Loaded {} entries: {} duplicates in {} groups.",
                index.entry_count(),
                index.duplicate_count(),
                index.group_count()
            ),
            Err(e) => {
                log::debug!("Load of {} failed: {e}", path.display());
                writeln!(writer, "{} {e}", "Error:".red())
            }
        }
    }

    fn scan<R: BufRead, W: Write>(
        &self,
        state: &mut MenuState,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        writeln!(writer, "Enter the directory paths to scan, separated by spaces.")?;
        let Some(input) = prompt_line(reader, writer, "Paths: ")? else {
            return Ok(());
        };
        let roots: Vec<PathBuf> = input.split_whitespace().map(PathBuf::from).collect();

        let request = match self.config.scan.request(&roots) {
            Ok(request) => request,
            Err(e) => return writeln!(writer, "{e}. Aborting scan."),
        };

        writeln!(writer, "\nAbout to run the following command:")?;
        writeln!(writer, "{}", request.command_line())?;
        if !prompt_confirm(reader, writer, "Continue?")? {
            return writeln!(writer, "Scan cancelled.");
        }

        match request.run() {
            Ok(report) => {
                writeln!(
                    writer,
                    "\nScan complete. Output saved to '{}' and '{}'.",
                    report.display(),
                    request.script_path().display()
                )?;
                self.load_into(state, &report, writer)
            }
            Err(e) => writeln!(writer, "\n{} {e}", "Error during scan:".red()),
        }
    }
}
