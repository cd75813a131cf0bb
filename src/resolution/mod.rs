//! Resolution of duplicate groups into keep/skip/delete decisions.
//!
//! # Overview
//!
//! Given confirmed duplicate groups and an optional golden root, resolution:
//!
//! 1. Orders groups largest file first ([`policy::order_groups`])
//! 2. Orders each group's members so the keeper comes first: golden copies
//!    before work copies, then oldest modification time
//!    ([`policy::order_members`])
//! 3. Tags the first member [`Tag::Keep`], other golden members
//!    [`Tag::Skip`], and the rest [`Tag::Delete`] ([`policy::classify`])
//! 4. Optionally deletes every `Delete` member, one file at a time
//!    ([`engine::Resolver`])
//!
//! The returned [`Stats`] satisfy `keep + skip + to_delete == total`; a
//! violation aborts the run as an internal error.

pub mod engine;
pub mod policy;

use std::fmt;

pub use engine::{
    resolve, Deletion, GroupHeader, GroupReporter, NullReporter, ResolveError, ResolvedMember,
    Resolver,
};
pub use policy::{check_roots, classify, is_golden, order_groups, order_members, Member, Roots};

/// Decision for one member of a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The single copy that survives.
    Keep,
    /// A redundant copy under the golden root; never touched.
    Skip,
    /// A redundant copy in the work tree; removed when purging.
    Delete,
}

impl Tag {
    /// Two-character marker used in the report.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Keep => " K",
            Self::Skip => " S",
            Self::Delete => "*D",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Counters for one resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Members across all detected groups, counted before tagging
    pub total: usize,
    /// Members tagged Keep (one per group)
    pub keep: usize,
    /// Members tagged Skip
    pub skip: usize,
    /// Members tagged Delete
    pub to_delete: usize,
    /// Delete members actually removed
    pub deleted: usize,
    /// Delete members whose removal failed
    pub failed: usize,
}

impl Stats {
    /// Check `keep + skip + to_delete == total`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.keep + self.skip + self.to_delete == self.total
    }

    /// Tally the tags of one group. `total` is not touched.
    pub fn record(&mut self, tags: &[Tag]) {
        for tag in tags {
            match tag {
                Tag::Keep => self.keep += 1,
                Tag::Skip => self.skip += 1,
                Tag::Delete => self.to_delete += 1,
            }
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total duplicates: {}, keep: {}, skipped (in golden): {}, deleted: {}/{}",
            self.keep + self.skip + self.to_delete,
            self.keep,
            self.skip,
            self.deleted,
            self.to_delete
        )
    }
}
