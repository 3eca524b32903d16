//! Line prompts and paging over generic readers and writers.

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::{Command, Stdio};

/// Pager used when `$PAGER` is unset.
pub const DEFAULT_PAGER: &str = "less";

/// Read one line without its terminator. `None` at end of input.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(
        line.trim_end_matches('\n').trim_end_matches('\r').to_string(),
    ))
}

/// Print `message` and read the answer.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(writer, "{message}")?;
    writer.flush()?;
    read_line(reader)
}

/// Ask a yes/no question that defaults to no.
///
/// Only `y` or `yes` (any case) confirms; end of input declines.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn prompt_confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
) -> io::Result<bool> {
    let answer = prompt_line(reader, writer, &format!("{message} [y/N]: "))?;
    Ok(answer.is_some_and(|a| {
        let a = a.trim();
        a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
    }))
}

/// Where long lists are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pager {
    /// Pipe through an external pager command line.
    Command(String),
    /// Write straight to the output.
    Direct,
}

impl Pager {
    /// `$PAGER` (or `less`) on a terminal, direct output otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        if !io::stdout().is_terminal() {
            return Self::Direct;
        }
        let program = env::var("PAGER")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());
        Self::Command(program)
    }

    /// Show `content`, falling back to `writer` if the pager cannot run.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the fallback output fails.
    pub fn show<W: Write>(&self, content: &str, writer: &mut W) -> io::Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        if let Self::Command(program) = self {
            match spawn_pager(program, content) {
                Ok(()) => return Ok(()),
                Err(e) => log::debug!("Pager '{program}' unavailable, printing directly: {e}"),
            }
        }
        writer.write_all(content.as_bytes())
    }
}

fn spawn_pager(command_line: &str, content: &str) -> io::Result<()> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty pager command"))?;

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        // quitting the pager early closes the pipe
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    let status = child.wait()?;
    if !status.success() {
        log::debug!("Pager exited with {status}");
    }
    Ok(())
}
