//! Filesystem primitives used by the deletion executor.
//!
//! The executor only ever needs five operations: an existence check, file
//! removal, empty-directory removal, and reading/writing directory
//! timestamps. They sit behind the [`Filesystem`] trait so tests can inject
//! failures that are hard to provoke on a real disk.

use std::fs;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use filetime::FileTime;
use serde::{Deserialize, Serialize};

/// How a live run removes a verified duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    /// Unlink the file (cannot be undone)
    #[default]
    Permanent,
    /// Move the file to the system trash
    Trash,
}

impl std::fmt::Display for DeleteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// Access and modification times of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirTimes {
    /// Last access time
    pub accessed: FileTime,
    /// Last modification time
    pub modified: FileTime,
}

/// Filesystem operations the executor depends on.
pub trait Filesystem {
    /// Whether something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory, which must be empty.
    ///
    /// # Errors
    ///
    /// Fails with [`io::ErrorKind::DirectoryNotEmpty`] if the directory still
    /// has entries, or with the underlying I/O error.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Read a directory's timestamps.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn dir_times(&self, path: &Path) -> io::Result<DirTimes>;

    /// Overwrite a directory's timestamps.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn set_dir_times(&self, path: &Path, times: DirTimes) -> io::Result<()>;
}

/// The real local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem {
    method: DeleteMethod,
}

impl LocalFilesystem {
    /// Create a filesystem that removes files with `method`.
    #[must_use]
    pub fn new(method: DeleteMethod) -> Self {
        Self { method }
    }

    /// The configured delete method.
    #[must_use]
    pub fn method(&self) -> DeleteMethod {
        self.method
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match self.method {
            DeleteMethod::Permanent => fs::remove_file(path),
            DeleteMethod::Trash => {
                // trash reports its own error type; keep the message
                trash::delete(path).map_err(|e| io::Error::other(e.to_string()))
            }
        }
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn dir_times(&self, path: &Path) -> io::Result<DirTimes> {
        let metadata = fs::metadata(path)?;
        Ok(DirTimes {
            accessed: FileTime::from_last_access_time(&metadata),
            modified: FileTime::from_last_modification_time(&metadata),
        })
    }

    fn set_dir_times(&self, path: &Path, times: DirTimes) -> io::Result<()> {
        filetime::set_file_times(path, times.accessed, times.modified)
    }
}

/// Whether a directory removal failed only because entries remain.
#[must_use]
pub fn is_not_empty(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::DirectoryNotEmpty
}
