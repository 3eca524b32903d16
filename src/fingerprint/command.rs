//! Fingerprints computed by an external checksum program.
//!
//! The program is run as `<program> [args...] -- <path>` and the first
//! whitespace-separated token of its stdout is taken as the digest, which is
//! the output format shared by `b2sum`, `sha256sum` and `b3sum`. When the
//! file name needs escaping these tools prefix the line with `\`; that
//! marker is not part of the digest.

use std::path::Path;
use std::process::Command;

use super::{FingerprintError, Fingerprinter};

/// Default external program, matching rmlint's default BLAKE2b checksums.
pub const B2SUM: &str = "b2sum";

/// Runs an external `*sum` program per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFingerprinter {
    program: String,
    args: Vec<String>,
}

impl CommandFingerprinter {
    /// Create a fingerprinter for `program` with no extra arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// The `b2sum` fingerprinter.
    #[must_use]
    pub fn b2sum() -> Self {
        Self::new(B2SUM)
    }

    /// Arguments placed before the file path.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Fingerprinter for CommandFingerprinter {
    fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError> {
        if !path.exists() {
            return Err(FingerprintError::NotFound(path.to_path_buf()));
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--")
            .arg(path)
            .output()
            .map_err(|source| FingerprintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FingerprintError::CommandFailed {
                program: self.program.clone(),
                path: path.to_path_buf(),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        parse_digest(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            FingerprintError::EmptyOutput {
                program: self.program.clone(),
                path: path.to_path_buf(),
            }
        })
    }
}

/// Extract the digest from `*sum`-style output (`<digest>  <path>`).
fn parse_digest(stdout: &str) -> Option<String> {
    let token = stdout.split_whitespace().next()?;
    let digest = token.strip_prefix('\\').unwrap_or(token);
    (!digest.is_empty()).then(|| digest.to_string())
}
