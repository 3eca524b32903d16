//! Ctrl+C handling for deletion runs.
//!
//! The handler only sets a shared flag. The deletion executor checks it
//! before each duplicate, so a file that is already being verified or
//! removed is always finished before the run stops.
//!
//! ```rust,no_run
//! use rmlint_manager::actions::ExecutorConfig;
//! use rmlint_manager::signal::install_handler;
//!
//! let handler = install_handler();
//! let config = ExecutorConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Cloneable view of the process-wide shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// A handler that is not wired to any signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or a shutdown was requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown as if Ctrl+C had been pressed.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The flag to hand to
    /// [`ExecutorConfig::with_shutdown_flag`](crate::actions::ExecutorConfig::with_shutdown_flag).
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag before the next batch in the same process.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static INSTALLED: OnceLock<ShutdownHandler> = OnceLock::new();

fn hook(handler: &ShutdownHandler) -> Result<(), SignalError> {
    let flag = handler.get_flag();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Finishing the current file...");
        let _ = stderr.flush();
    })?;
    Ok(())
}

/// Install the Ctrl+C handler once per process and return its flag.
///
/// Later calls return the same handler with the flag cleared. If the
/// signal is already owned by another hook, the failure is logged at debug
/// and the returned handler is not wired to Ctrl+C but still honors
/// [`ShutdownHandler::request_shutdown`].
pub fn install_handler() -> ShutdownHandler {
    let handler = INSTALLED.get_or_init(|| {
        let handler = ShutdownHandler::new();
        match hook(&handler) {
            Ok(()) => log::debug!("Ctrl+C handler installed"),
            Err(e) => log::debug!("{e}; continuing without Ctrl+C handling"),
        }
        handler
    });
    handler.reset();
    handler.clone()
}
