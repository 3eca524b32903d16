//! Content fingerprinting used to re-verify files before deletion.
//!
//! The executor never trusts the checksums recorded in a report on their own:
//! it recomputes them with a [`Fingerprinter`] that must use the same
//! algorithm rmlint used. rmlint defaults to BLAKE2b, whose digests match the
//! `b2sum` tool, so [`CommandFingerprinter::b2sum`] is the default.
//!
//! # Architecture
//!
//! - [`command`]: digests computed by an external `*sum`-style program
//! - [`native`]: in-process BLAKE3 and SHA-256 digests
//!
//! Closures of the shape `Fn(&Path) -> Result<String, FingerprintError>`
//! implement [`Fingerprinter`] too, which keeps tests free of subprocesses.

pub mod command;
pub mod native;

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandFingerprinter;
pub use native::{Blake3Fingerprinter, Sha256Fingerprinter};

/// Errors that can occur while fingerprinting a file.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path being fingerprinted
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The fingerprint program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// The underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The fingerprint program exited unsuccessfully.
    #[error("{program} failed for {path}: {message}")]
    CommandFailed {
        /// Program name
        program: String,
        /// Path being fingerprinted
        path: PathBuf,
        /// Exit status and stderr
        message: String,
    },

    /// The fingerprint program printed no digest.
    #[error("{program} produced no digest for {path}")]
    EmptyOutput {
        /// Program name
        program: String,
        /// Path being fingerprinted
        path: PathBuf,
    },
}

impl FingerprintError {
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Computes a hex digest of a file's content.
pub trait Fingerprinter {
    /// Fingerprint the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError`] if the file cannot be read or hashed.
    fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError>;
}

impl<F> Fingerprinter for F
where
    F: Fn(&Path) -> Result<String, FingerprintError>,
{
    fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError> {
        self(path)
    }
}

/// Fingerprint algorithm selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// BLAKE2b via the external `b2sum` program (rmlint's default)
    #[default]
    B2sum,
    /// In-process BLAKE3
    Blake3,
    /// In-process SHA-256
    Sha256,
    /// A user-configured external program
    Command,
}

impl std::fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::B2sum => write!(f, "b2sum"),
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Command => write!(f, "command"),
        }
    }
}

/// Create the fingerprinter for an algorithm.
///
/// `program` and `args` are only used by [`FingerprintAlgorithm::Command`].
#[must_use]
pub fn create_fingerprinter(
    algorithm: FingerprintAlgorithm,
    program: &str,
    args: &[String],
) -> Box<dyn Fingerprinter> {
    match algorithm {
        FingerprintAlgorithm::B2sum => Box::new(CommandFingerprinter::b2sum()),
        FingerprintAlgorithm::Blake3 => Box::new(Blake3Fingerprinter),
        FingerprintAlgorithm::Sha256 => Box::new(Sha256Fingerprinter),
        FingerprintAlgorithm::Command => {
            Box::new(CommandFingerprinter::new(program).with_args(args.to_vec()))
        }
    }
}
