//! Permanent single-file deletion.
//!
//! # Overview
//!
//! Redundant copies are unlinked directly; there is no trash step. Each call
//! handles exactly one path, so a failure on one file never affects another.
//!
//! # Example
//!
//! ```no_run
//! use dupurge::actions::delete::delete_file;
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is no longer a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// The copy chosen to survive could not be read, so nothing in its group
    /// is removed.
    #[error("kept copy {keeper} is unreadable, not deleting {path}")]
    KeeperUnavailable {
        /// Path that was left in place
        path: PathBuf,
        /// The unreadable keeper
        keeper: PathBuf,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::KeeperUnavailable { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// Permanently delete one regular file.
///
/// # Errors
///
/// - [`DeleteError::NotFound`] if the file is already gone
/// - [`DeleteError::NotAFile`] if the path now names a directory or link
/// - [`DeleteError::PermissionDenied`] / [`DeleteError::Io`] if unlinking fails
pub fn delete_file(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if !metadata.file_type().is_file() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }

    fs::remove_file(path).map_err(|e| {
        log::error!("Delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::debug!("Deleted: {} ({} bytes)", path.display(), metadata.len());

    Ok(DeleteResult {
        path: path.to_path_buf(),
        size: metadata.len(),
    })
}
