//! Application configuration management.
//!
//! Configuration is layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or `--config PATH`)
//! 3. `RMLINT_MANAGER_*` environment variables, nested keys split on `__`
//!    (e.g. `RMLINT_MANAGER_DELETE__METHOD=trash`)
//! 4. CLI flags
//!
//! # Example
//!
//! ```toml
//! top_n = 20
//!
//! [fingerprint]
//! algorithm = "command"
//! command = "sha1sum"
//!
//! [delete]
//! method = "trash"
//! protected_dirs = ["/home/me"]
//!
//! [scan]
//! output_dir = "/var/tmp/rmlint"
//! extra_args = ["--hidden"]
//! ```

use anyhow::Result;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::actions::{DeleteMethod, ExecutorConfig};
use crate::cli::{Cli, Commands};
use crate::fingerprint::{create_fingerprinter, FingerprintAlgorithm, Fingerprinter};
use crate::scan::{ScanError, ScanRequest};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "RMLINT_MANAGER_";

/// How files are re-verified before deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Digest algorithm; must match the one the report was built with.
    pub algorithm: FingerprintAlgorithm,
    /// Program run for the `command` algorithm.
    pub command: String,
    /// Arguments passed before the file path.
    pub args: Vec<String>,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            algorithm: FingerprintAlgorithm::default(),
            command: crate::fingerprint::command::B2SUM.to_string(),
            args: Vec::new(),
        }
    }
}

impl FingerprintConfig {
    /// Build the configured fingerprinter.
    #[must_use]
    pub fn fingerprinter(&self) -> Box<dyn Fingerprinter> {
        create_fingerprinter(self.algorithm, &self.command, &self.args)
    }
}

/// Live deletion behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteConfig {
    /// Unlink files or move them to the trash.
    pub method: DeleteMethod,
    /// Remove directories left empty by a deletion.
    pub cleanup_empty_dirs: bool,
    /// Restore timestamps of parent directories that keep entries.
    pub restore_timestamps: bool,
    /// Directories never removed during cleanup.
    pub protected_dirs: Vec<PathBuf>,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            method: DeleteMethod::default(),
            cleanup_empty_dirs: true,
            restore_timestamps: true,
            protected_dirs: Vec::new(),
        }
    }
}

impl DeleteConfig {
    /// Executor settings for this configuration.
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_cleanup_empty_dirs(self.cleanup_empty_dirs)
            .with_restore_timestamps(self.restore_timestamps)
            .with_protected_dirs(self.protected_dirs.clone())
    }
}

/// rmlint invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// rmlint executable.
    pub program: String,
    /// Extra arguments inserted before the scan roots.
    pub extra_args: Vec<String>,
    /// Where reports are written (current directory when unset).
    pub output_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            program: crate::scan::RMLINT.to_string(),
            extra_args: Vec::new(),
            output_dir: None,
        }
    }
}

impl ScanConfig {
    /// A scan request over `roots` using these settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if no root is a directory.
    pub fn request(&self, roots: &[PathBuf]) -> Result<ScanRequest, ScanError> {
        let mut request = ScanRequest::new(roots)?
            .with_program(self.program.clone())
            .with_extra_args(self.extra_args.clone());
        if let Some(ref dir) = self.output_dir {
            request = request.with_output_dir(dir.clone());
        }
        Ok(request)
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Re-verification settings.
    pub fingerprint: FingerprintConfig,
    /// Deletion settings.
    pub delete: DeleteConfig,
    /// Scan launcher settings.
    pub scan: ScanConfig,
    /// Entries shown by the top-N view.
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fingerprint: FingerprintConfig::default(),
            delete: DeleteConfig::default(),
            scan: ScanConfig::default(),
            top_n: 10,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults when the file is unreadable or invalid.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_path(&path),
            Err(e) => {
                log::debug!("No config directory, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from a specific file.
    ///
    /// A missing file contributes nothing; an invalid one is ignored with a
    /// debug log and the built-in defaults are used.
    pub fn load_from_path(path: &Path) -> Self {
        match Self::figment(path).extract() {
            Ok(config) => config,
            Err(e) => {
                log::debug!(
                    "Failed to load config from {}, using defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// The layered figment for a config file, without CLI overrides.
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply CLI flags on top of the loaded configuration.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(algorithm) = cli.fingerprint {
            self.fingerprint.algorithm = algorithm;
        }

        match &cli.command {
            Some(Commands::Delete(args)) => {
                if args.trash {
                    self.delete.method = DeleteMethod::Trash;
                }
                if args.keep_empty_dirs {
                    self.delete.cleanup_empty_dirs = false;
                }
            }
            Some(Commands::Top(args)) => {
                if let Some(count) = args.count {
                    self.top_n = count;
                }
            }
            Some(Commands::Scan(args)) => {
                if let Some(ref dir) = args.out_dir {
                    self.scan.output_dir = Some(dir.clone());
                }
            }
            _ => {}
        }
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "rmlint-manager", "rmlint-manager")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
