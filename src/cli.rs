//! Command-line interface definitions for rmlint-manager.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Without a subcommand the interactive menu starts, optionally with a report
//! already loaded. The subcommands run a single query or action and exit.
//!
//! # Example
//!
//! ```bash
//! # Interactive menu with a report preloaded
//! rmlint-manager rmlint.json
//!
//! # Reclaimable space as JSON
//! rmlint-manager --output json space rmlint.json
//!
//! # Verify everything, delete nothing
//! rmlint-manager dry-run rmlint.json
//!
//! # Delete without prompting, moving files to the trash
//! rmlint-manager delete rmlint.json --yes --trash
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::fingerprint::FingerprintAlgorithm;

/// Inspect rmlint duplicate reports and execute verified deletion plans.
///
/// Every duplicate is re-hashed together with its original right before it
/// is deleted; anything that changed since the scan is skipped.
#[derive(Debug, Parser)]
#[command(name = "rmlint-manager")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for query and deletion results
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Algorithm used to re-verify files before deletion
    #[arg(long, global = true, value_enum, value_name = "ALGORITHM")]
    pub fingerprint: Option<FingerprintAlgorithm>,

    /// Report to load when starting the interactive menu
    #[arg(value_name = "REPORT")]
    pub report: Option<PathBuf>,

    /// Subcommand to execute (interactive menu when absent)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for rmlint-manager.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count report entries per lint type
    Summary(ReportArgs),
    /// Total space freed by deleting every duplicate
    Space(ReportArgs),
    /// List the files marked for deletion (or the originals)
    List(ListArgs),
    /// Show the largest files marked for deletion
    Top(TopArgs),
    /// Verify the deletion plan without deleting anything
    DryRun(ReportArgs),
    /// Verify and execute the deletion plan
    Delete(DeleteArgs),
    /// Run a new rmlint scan and summarize its report
    Scan(ScanArgs),
}

/// A report to operate on.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// rmlint JSON report
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// List originals instead of duplicates
    #[arg(long)]
    pub originals: bool,
}

/// Arguments for the top subcommand.
#[derive(Debug, Args)]
pub struct TopArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Number of files to show (default from configuration, 10)
    #[arg(short = 'n', long = "count", value_name = "N")]
    pub count: Option<usize>,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Move files to the system trash instead of deleting them permanently
    #[arg(long)]
    pub trash: bool,

    /// Leave directories that become empty in place
    #[arg(long)]
    pub keep_empty_dirs: bool,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan recursively
    #[arg(value_name = "ROOT", required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Directory to write the JSON report and shell script into
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Run the scan without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
