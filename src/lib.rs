//! rmlint-manager - inspect rmlint reports and execute verified deletion plans
//!
//! Loads the JSON report written by `rmlint`, groups its duplicate files by
//! checksum into originals and duplicates, and deletes duplicates only after
//! re-hashing both the duplicate and its original. Directories left empty
//! are pruned; parents that keep entries get their timestamps back.

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod menu;
pub mod output;
pub mod progress;
pub mod report;
pub mod scan;
pub mod signal;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::actions::{DeletionExecutor, ExecutionMode, Filesystem, LocalFilesystem};
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::fingerprint::Fingerprinter;
use crate::menu::{prompt_confirm, Menu, MenuState};
use crate::output::{json, text};
use crate::progress::DeletionProgress;
use crate::report::{load_report, ReportIndex};
use crate::signal::ShutdownHandler;

/// Everything a command needs besides its own arguments.
struct AppContext<'a> {
    config: &'a Config,
    output: OutputFormat,
    quiet: bool,
    shutdown: &'a ShutdownHandler,
    fingerprinter: &'a dyn Fingerprinter,
    filesystem: &'a dyn Filesystem,
}

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error if a report cannot be loaded, a scan fails, or output
/// cannot be written. Per-file deletion failures are not errors; they show
/// up in the summary and the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = match cli.config {
        Some(ref path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.merge_cli(&cli);
    log::debug!("Configuration: {config:?}");

    let shutdown = signal::install_handler();
    let fingerprinter = config.fingerprint.fingerprinter();
    let filesystem = LocalFilesystem::new(config.delete.method);

    let ctx = AppContext {
        config: &config,
        output: cli.output,
        quiet: cli.quiet,
        shutdown: &shutdown,
        fingerprinter: fingerprinter.as_ref(),
        filesystem: &filesystem,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None => run_menu(&ctx, cli.report.as_deref(), &mut out),
        Some(Commands::Summary(ref args)) => {
            let index = load(&args.report)?;
            match ctx.output {
                OutputFormat::Text => text::write_summary(&mut out, &index)?,
                OutputFormat::Json => {
                    json::write_json(&json::JsonSummary::from_index(&index), &mut out, true)?;
                }
            }
            Ok(query_exit_code(&index))
        }
        Some(Commands::Space(ref args)) => {
            let index = load(&args.report)?;
            match ctx.output {
                OutputFormat::Text => text::write_space(&mut out, &index)?,
                OutputFormat::Json => {
                    json::write_json(&json::JsonSpace::from_index(&index), &mut out, true)?;
                }
            }
            Ok(query_exit_code(&index))
        }
        Some(Commands::List(ref args)) => {
            let index = load(&args.report.report)?;
            let (kind, entries): (&'static str, Vec<_>) = if args.originals {
                ("originals", index.originals().collect())
            } else {
                ("duplicates", index.duplicates().collect())
            };
            match ctx.output {
                OutputFormat::Text => text::write_paths(&mut out, entries)?,
                OutputFormat::Json => {
                    json::write_json(&json::JsonEntryList::new(kind, entries), &mut out, true)?;
                }
            }
            Ok(query_exit_code(&index))
        }
        Some(Commands::Top(ref args)) => {
            let index = load(&args.report.report)?;
            let top = index.top_n_by_size(ctx.config.top_n);
            match ctx.output {
                OutputFormat::Text => text::write_top(&mut out, &top)?,
                OutputFormat::Json => {
                    json::write_json(&json::JsonEntryList::new("top", top), &mut out, true)?;
                }
            }
            Ok(query_exit_code(&index))
        }
        Some(Commands::DryRun(ref args)) => {
            let index = load(&args.report)?;
            run_deletion(&ctx, &index, ExecutionMode::DryRun, &mut out)
        }
        Some(Commands::Delete(ref args)) => {
            let index = load(&args.report.report)?;
            if !args.yes && !index.is_empty() && !confirm_deletion(&ctx, &index)? {
                eprintln!("Deletion cancelled.");
                return Ok(ExitCode::Success);
            }
            run_deletion(&ctx, &index, ExecutionMode::Live, &mut out)
        }
        Some(Commands::Scan(ref args)) => {
            let request = ctx.config.scan.request(&args.roots)?;
            if !args.yes {
                eprintln!("About to run the following command:");
                eprintln!("{}", request.command_line());
                let stdin = io::stdin();
                if !prompt_confirm(&mut stdin.lock(), &mut io::stderr(), "Continue?")? {
                    eprintln!("Scan cancelled.");
                    return Ok(ExitCode::Success);
                }
            }

            let report = request.run()?;
            let index = load(&report)?;
            match ctx.output {
                OutputFormat::Text => {
                    writeln!(out, "Report: {}", report.display())?;
                    text::write_summary(&mut out, &index)?;
                }
                OutputFormat::Json => {
                    json::write_json(&json::JsonSummary::from_index(&index), &mut out, true)?;
                }
            }
            Ok(query_exit_code(&index))
        }
    }
}

fn load(path: &Path) -> Result<ReportIndex> {
    load_report(path).with_context(|| format!("Failed to load report {}", path.display()))
}

fn query_exit_code(index: &ReportIndex) -> ExitCode {
    if index.is_empty() {
        ExitCode::NothingToDo
    } else {
        ExitCode::Success
    }
}

fn confirm_deletion(ctx: &AppContext<'_>, index: &ReportIndex) -> Result<bool> {
    let question = format!(
        "Delete {} files ({}) using {} removal?",
        index.duplicate_count(),
        text::format_size(index.total_reclaimable_bytes()),
        ctx.config.delete.method
    );
    let stdin = io::stdin();
    Ok(prompt_confirm(&mut stdin.lock(), &mut io::stderr(), &question)?)
}

fn run_deletion<W: Write>(
    ctx: &AppContext<'_>,
    index: &ReportIndex,
    mode: ExecutionMode,
    out: &mut W,
) -> Result<ExitCode> {
    let config = ctx
        .config
        .delete
        .executor_config()
        .with_shutdown_flag(ctx.shutdown.get_flag());
    let executor = DeletionExecutor::new(ctx.fingerprinter, ctx.filesystem, config);
    let progress =
        DeletionProgress::new(ctx.quiet).with_item_lines(ctx.output == OutputFormat::Text);

    let run = executor.execute_observed(index, mode, &progress);

    match ctx.output {
        OutputFormat::Text => text::write_deletion_summary(out, &run.summary)?,
        OutputFormat::Json => json::write_json(&run, out, true)?,
    }
    Ok(ExitCode::from_summary(&run.summary))
}

fn run_menu<W: Write>(ctx: &AppContext<'_>, report: Option<&Path>, out: &mut W) -> Result<ExitCode> {
    let mut state = MenuState::new();
    if let Some(path) = report {
        if let Err(e) = state.load(path) {
            writeln!(out, "Error loading initial file '{}': {e}", path.display())?;
        }
    }

    let menu = Menu::new(ctx.config, ctx.fingerprinter, ctx.filesystem)
        .with_shutdown(ctx.shutdown.clone())
        .with_quiet(ctx.quiet);

    let stdin = io::stdin();
    menu.run(&mut state, &mut stdin.lock(), out)?;
    Ok(ExitCode::Success)
}
