//! Root validation, ordering and tagging rules.
//!
//! Everything here is decided from paths and modification times alone; no
//! file is modified.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::Tag;
use crate::config::ConfigError;
use crate::duplicates::DuplicateGroup;
use crate::scanner::path_utils::{absolute_clean, is_under};

/// Validated work and golden roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    work: PathBuf,
    golden: Option<PathBuf>,
}

impl Roots {
    /// Absolute work root.
    #[must_use]
    pub fn work(&self) -> &Path {
        &self.work
    }

    /// Absolute golden root, if any.
    #[must_use]
    pub fn golden(&self) -> Option<&Path> {
        self.golden.as_deref()
    }

    /// Check whether `path` lies under the golden root.
    #[must_use]
    pub fn is_golden(&self, path: &Path) -> bool {
        is_golden(path, self.golden())
    }
}

/// Validate the roots before any scanning.
///
/// Both roots are made absolute and lexically cleaned. The work root must not
/// equal the golden root or lie beneath it; the reverse (golden inside work)
/// is allowed, and golden files found there stay protected.
///
/// # Errors
///
/// - [`ConfigError::WorkInsideGolden`] for the nesting violation
/// - [`ConfigError::WorkNotFound`] / [`ConfigError::GoldenNotFound`] if a
///   root is not an existing directory
/// - [`ConfigError::InvalidPath`] if a relative root cannot be resolved
pub fn check_roots(work: &Path, golden: Option<&Path>) -> Result<Roots, ConfigError> {
    let resolve = |path: &Path| {
        absolute_clean(path).map_err(|source| ConfigError::InvalidPath {
            path: path.to_path_buf(),
            source,
        })
    };

    let work = resolve(work)?;
    let golden = golden.map(resolve).transpose()?;

    if let Some(golden) = &golden {
        if is_under(&work, golden) {
            return Err(ConfigError::WorkInsideGolden {
                work,
                golden: golden.clone(),
            });
        }
        if !golden.is_dir() {
            return Err(ConfigError::GoldenNotFound(golden.clone()));
        }
    }
    if !work.is_dir() {
        return Err(ConfigError::WorkNotFound(work));
    }

    log::debug!("Roots: work={} golden={:?}", work.display(), golden);
    Ok(Roots { work, golden })
}

/// Check whether `path` lies under `golden` (false when there is no golden root).
#[must_use]
pub fn is_golden(path: &Path, golden: Option<&Path>) -> bool {
    golden.is_some_and(|g| is_under(path, g))
}

/// One group member with the attributes used to pick the keeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member path
    pub path: PathBuf,
    /// Whether the path lies under the golden root
    pub in_golden: bool,
    /// Modification time, or the error text if it could not be read
    pub mtime: Result<SystemTime, String>,
}

impl Member {
    /// Observe the attributes of `path`.
    #[must_use]
    pub fn observe(path: PathBuf, golden: Option<&Path>) -> Self {
        let in_golden = is_golden(&path, golden);
        let mtime = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| {
                log::warn!("Cannot read mtime of {}: {}", path.display(), e);
                e.to_string()
            });
        Self {
            path,
            in_golden,
            mtime,
        }
    }

    /// Sort key: golden before work, then readable before unreadable, then
    /// oldest first.
    ///
    /// A member whose mtime cannot be read (usually a file that vanished after
    /// hashing) never outranks a readable member of the same side.
    #[must_use]
    pub fn sort_key(&self) -> (u8, bool, SystemTime) {
        let rank = u8::from(!self.in_golden);
        let mtime = self.mtime.as_ref().copied().unwrap_or(SystemTime::UNIX_EPOCH);
        (rank, self.mtime.is_err(), mtime)
    }

    /// Whether the member's metadata could be read.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.mtime.is_ok()
    }
}

/// Order groups by (file size, member count), largest first.
///
/// The sort is stable, so ties keep detection order.
#[must_use]
pub fn order_groups(mut groups: Vec<DuplicateGroup>) -> Vec<DuplicateGroup> {
    groups.sort_by(|a, b| (b.size, b.len()).cmp(&(a.size, a.len())));
    groups
}

/// Order a group's members so the keeper comes first.
///
/// Members under the golden root precede work members; within each side
/// readable members precede unreadable ones and the oldest modification time
/// wins. The sort is stable.
#[must_use]
pub fn order_members(paths: Vec<PathBuf>, golden: Option<&Path>) -> Vec<Member> {
    let mut members: Vec<Member> = paths
        .into_iter()
        .map(|p| Member::observe(p, golden))
        .collect();
    members.sort_by_key(Member::sort_key);
    members
}

/// Tag ordered members: first Keep, golden Skip, work Delete.
#[must_use]
pub fn classify(members: &[Member]) -> Vec<Tag> {
    members
        .iter()
        .enumerate()
        .map(|(i, m)| match (i, m.in_golden) {
            (0, _) => Tag::Keep,
            (_, true) => Tag::Skip,
            (_, false) => Tag::Delete,
        })
        .collect()
}
