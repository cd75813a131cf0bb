//! Confirmed duplicate groups.
//!
//! A [`DuplicateGroup`] is the output of the final filter stage: two or more
//! paths whose full-content digests are equal. Member order is the order the
//! paths survived the stages, which the resolution step later reorders.

use std::path::{Path, PathBuf};

use crate::scanner::{digest_to_hex, Digest};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 digest shared by every member
    pub digest: Digest,
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Member paths, at least two
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Arguments
    ///
    /// * `digest` - SHA-256 content digest
    /// * `size` - File size in bytes
    /// * `paths` - Member paths
    #[must_use]
    pub fn new(digest: Digest, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size.saturating_mul(self.paths.len() as u64)
    }

    /// Space held by the redundant copies (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size
            .saturating_mul(self.duplicate_count() as u64)
    }

    /// Number of redundant copies.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Check whether `path` is a member of this group.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}
