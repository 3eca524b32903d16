//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! `RUST_LOG`, when set, replaces the CLI-derived filter entirely. Otherwise
//! `-q` keeps errors only and each `-v` raises the level one step from info.
//! Debug builds add a timestamp to every line and the module path from `-v`
//! on; release builds print level and message.
//!
//! ```rust,no_run
//! use rmlint_manager::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("shown with -v");
//! ```

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// How log lines are filtered and laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    /// Filter directives from `RUST_LOG`, used instead of `level`.
    env_filter: Option<String>,
    level: LevelFilter,
    timestamps: bool,
    module_path: bool,
}

impl LogSettings {
    fn from_flags(verbose: u8, quiet: bool, env_filter: Option<String>) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };
        Self {
            env_filter: env_filter.filter(|filters| !filters.trim().is_empty()),
            level,
            timestamps: cfg!(debug_assertions),
            module_path: cfg!(debug_assertions) && verbose >= 1,
        }
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        builder.target(Target::Stderr);
        match self.env_filter {
            Some(ref filters) => builder.parse_filters(filters),
            None => builder.filter_level(self.level),
        };

        let (timestamps, module_path) = (self.timestamps, self.module_path);
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            if timestamps {
                let timestamp = buf.timestamp_seconds();
                write!(buf, "{timestamp} ")?;
            }
            write!(buf, "{style}{:<5}{style:#} ", record.level())?;
            if module_path {
                write!(buf, "[{}] ", record.module_path().unwrap_or("unknown"))?;
            }
            writeln!(buf, "{}", record.args())
        });
        builder
    }
}

/// Initialize logging from the CLI verbosity flags.
///
/// Call once, before any log macro. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let settings = LogSettings::from_flags(verbose, quiet, env::var("RUST_LOG").ok());
    if settings.builder().try_init().is_err() {
        return;
    }

    match settings.env_filter {
        Some(ref filters) => log::debug!("Logging initialized from RUST_LOG={filters}"),
        None => log::debug!("Logging initialized at level: {}", settings.level),
    }
}
