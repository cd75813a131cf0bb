//! Bottom-up removal of empty directories.
//!
//! After a purge the work tree is often left with directories that held only
//! duplicates. [`remove_empty_dirs`] walks the tree children-first and removes
//! every directory that ended up empty. A directory whose only entry is an OS
//! marker file (such as `.DS_Store`) counts as empty; the marker is removed
//! first. The root itself is never removed, and nothing inside a protected
//! subtree (the golden root when it lies inside the work root) is touched.
//!
//! # Example
//!
//! ```no_run
//! use dupurge::actions::cleanup::remove_empty_dirs;
//! use std::path::Path;
//!
//! let result = remove_empty_dirs(Path::new("/data/work"), &[".DS_Store".to_string()], None);
//! for dir in &result.removed_dirs {
//!     println!("removed {}", dir.display());
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::scanner::path_utils::is_under;

/// Outcome of an empty-directory sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Directories removed, children before parents
    pub removed_dirs: Vec<PathBuf>,
    /// Marker files removed to empty their directory
    pub removed_markers: Vec<PathBuf>,
    /// Entries that could not be inspected or removed, with the error text
    pub failures: Vec<(PathBuf, String)>,
}

impl CleanupResult {
    /// Number of directories removed.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_dirs.len()
    }
}

/// Remove empty directories below `root`, deepest first.
///
/// Symlinked directories are never entered nor removed. Directories that are
/// still non-empty are skipped silently, as is everything under `protected`.
#[must_use]
pub fn remove_empty_dirs(
    root: &Path,
    marker_files: &[String],
    protected: Option<&Path>,
) -> CleanupResult {
    let mut result = CleanupResult::default();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                log::warn!("Cleanup: cannot inspect {}: {}", path.display(), e);
                result.failures.push((path, e.to_string()));
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        if protected.is_some_and(|p| is_under(dir, p)) {
            continue;
        }
        if let Some(marker) = lone_marker(dir, marker_files) {
            match fs::remove_file(&marker) {
                Ok(()) => {
                    log::debug!("Removed marker file {}", marker.display());
                    result.removed_markers.push(marker);
                }
                Err(e) => {
                    log::warn!("Cleanup: cannot remove {}: {}", marker.display(), e);
                    result.failures.push((marker, e.to_string()));
                    continue;
                }
            }
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                log::info!("Empty directory removed: {}", dir.display());
                result.removed_dirs.push(dir.to_path_buf());
            }
            Err(e) if is_not_empty(&e) => {
                log::trace!("Directory not empty, kept: {}", dir.display());
            }
            Err(e) => {
                log::warn!("Cleanup: cannot remove {}: {}", dir.display(), e);
                result.failures.push((dir.to_path_buf(), e.to_string()));
            }
        }
    }

    log::debug!(
        "Cleanup of {}: {} directories removed, {} failures",
        root.display(),
        result.removed_dirs.len(),
        result.failures.len()
    );

    result
}

/// The marker file inside `dir`, if it is the directory's only entry.
fn lone_marker(dir: &Path, marker_files: &[String]) -> Option<PathBuf> {
    let mut entries = fs::read_dir(dir).ok()?;
    let only = entries.next()?.ok()?;
    if entries.next().is_some() {
        return None;
    }

    let name = only.file_name();
    let is_marker = marker_files.iter().any(|m| name.as_os_str() == m.as_str());
    let is_file = only.file_type().is_ok_and(|t| t.is_file());
    (is_marker && is_file).then(|| only.path())
}

fn is_not_empty(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::DirectoryNotEmpty
}
