//! Launching rmlint to produce a fresh report.
//!
//! A scan writes two files side by side, named after the local time the
//! request was created:
//!
//! - `rmlint_<YYYY-mm-dd_HHMMSS>.json`, the report this tool loads
//! - `rmlint_<YYYY-mm-dd_HHMMSS>.sh`, rmlint's own removal script
//!
//! The command is `rmlint -g -T df -o json:<json> -o sh:<sh> [extra] <root>//...`:
//! progress bar on, duplicate files and directories only.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use thiserror::Error;

/// Default rmlint executable.
pub const RMLINT: &str = "rmlint";

/// Errors that can occur while preparing or running a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No root directory was given.
    #[error("no paths provided")]
    NoRoots,

    /// None of the given roots is a directory.
    #[error("no valid directories to scan")]
    NoValidRoots,

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// Directory that was requested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// rmlint could not be started.
    #[error("failed to run {program} (is it installed and in your PATH?): {source}")]
    Spawn {
        /// Program name
        program: String,
        /// The underlying spawn error
        #[source]
        source: io::Error,
    },

    /// rmlint exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Failed {
        /// Program name
        program: String,
        /// Rendered exit status
        status: String,
    },

    /// rmlint succeeded but the JSON report is not where it should be.
    #[error("scan finished but no report was written to {0}")]
    MissingReport(PathBuf),
}

/// A validated rmlint invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    roots: Vec<PathBuf>,
    program: String,
    extra_args: Vec<String>,
    output_dir: PathBuf,
    stamp: String,
}

impl ScanRequest {
    /// Validate `roots`, keeping only directories.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NoRoots`] for an empty list and
    /// [`ScanError::NoValidRoots`] when no root is a directory.
    pub fn new(roots: &[PathBuf]) -> Result<Self, ScanError> {
        if roots.is_empty() {
            return Err(ScanError::NoRoots);
        }

        let valid: Vec<PathBuf> = roots
            .iter()
            .filter(|root| {
                let ok = root.is_dir();
                if !ok {
                    log::warn!("'{}' is not a valid directory. Skipping.", root.display());
                }
                ok
            })
            .cloned()
            .collect();

        if valid.is_empty() {
            return Err(ScanError::NoValidRoots);
        }

        Ok(Self {
            roots: valid,
            program: RMLINT.to_string(),
            extra_args: Vec::new(),
            output_dir: PathBuf::from("."),
            stamp: timestamp(Local::now()),
        })
    }

    /// Use a different rmlint executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Extra arguments placed before the roots.
    #[must_use]
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Directory the report and script are written into.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Name the outputs after `time` instead of the creation time.
    #[must_use]
    pub fn with_timestamp(mut self, time: DateTime<Local>) -> Self {
        self.stamp = timestamp(time);
        self
    }

    /// Roots that passed validation.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Path of the JSON report.
    #[must_use]
    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(format!("rmlint_{}.json", self.stamp))
    }

    /// Path of the companion shell script.
    #[must_use]
    pub fn script_path(&self) -> PathBuf {
        self.output_dir.join(format!("rmlint_{}.sh", self.stamp))
    }

    /// Arguments passed to rmlint.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-g", "-T", "df"].iter().map(OsString::from).collect();

        args.push("-o".into());
        args.push(prefixed("json:", &self.json_path()));
        args.push("-o".into());
        args.push(prefixed("sh:", &self.script_path()));

        args.extend(self.extra_args.iter().map(OsString::from));
        args.extend(self.roots.iter().map(|root| recursive_root(root)));
        args
    }

    /// The full command line, for showing to the user before running.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args().iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run rmlint with inherited stdio and return the JSON report path.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if the output directory cannot be created,
    /// rmlint cannot be started or fails, or no report was written.
    pub fn run(&self) -> Result<PathBuf, ScanError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ScanError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        log::info!("Running: {}", self.command_line());
        let status = Command::new(&self.program)
            .args(self.args())
            .status()
            .map_err(|source| ScanError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ScanError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        let report = self.json_path();
        if !report.is_file() {
            return Err(ScanError::MissingReport(report));
        }
        log::info!(
            "Scan complete. Output saved to '{}' and '{}'",
            report.display(),
            self.script_path().display()
        );
        Ok(report)
    }
}

fn timestamp(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d_%H%M%S").to_string()
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}

/// `root//`, rmlint's marker for a recursive root.
fn recursive_root(root: &Path) -> OsString {
    let display = root.as_os_str().to_string_lossy();
    let trimmed = display.trim_end_matches('/');
    let mut arg = if trimmed.is_empty() || trimmed.len() == display.len() {
        root.as_os_str().to_os_string()
    } else {
        OsString::from(trimmed)
    };
    arg.push("//");
    arg
}
