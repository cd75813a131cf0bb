//! Applying the resolution policy to every group.
//!
//! The [`Resolver`] walks the ordered groups, tags each member, optionally
//! deletes the `Delete` members and reports everything through a
//! [`GroupReporter`]. A failed deletion is reported and counted; it never
//! stops the run. A group whose keeper cannot be read is reported but not
//! purged.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use super::policy::{classify, order_groups, order_members, Roots};
use super::{Stats, Tag};
use crate::actions::delete::{delete_file, DeleteError};
use crate::duplicates::DuplicateGroup;
use crate::scanner::path_utils::{common_dir_prefix, display_relative};

/// Errors that abort resolution.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// A redundant check failed; the tagging logic is broken.
    #[error("internal consistency check failed: {0}")]
    Inconsistent(String),

    /// The run was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Resolution interrupted by user")]
    Interrupted,
}

/// What happened to a member during purge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// No deletion was attempted.
    NotAttempted,
    /// The file was removed.
    Deleted,
    /// Removal failed with this message.
    Failed(String),
}

/// Per-group header passed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader {
    /// 1-based group position in resolution order
    pub position: usize,
    /// Number of members
    pub count: usize,
    /// Shared file size in bytes
    pub size: u64,
    /// Directory prefix shared by all members (may be empty)
    pub prefix: String,
}

/// One tagged member passed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    /// 1-based position within the group
    pub position: usize,
    /// Full path
    pub path: PathBuf,
    /// Path relative to the group prefix
    pub display: String,
    /// Decision for this member
    pub tag: Tag,
    /// Modification time, or the error text if it could not be read
    pub mtime: Result<SystemTime, String>,
    /// Purge outcome
    pub deletion: Deletion,
}

/// Receives resolution events in order.
pub trait GroupReporter {
    /// A group is about to be listed.
    fn on_group(&mut self, header: &GroupHeader);

    /// A member has been tagged (and deleted, if purging).
    fn on_member(&mut self, member: &ResolvedMember);

    /// A member was removed.
    fn on_deleted(&mut self, _member: &ResolvedMember) {}

    /// Removing a member failed.
    fn on_delete_failed(&mut self, _member: &ResolvedMember, _error: &DeleteError) {}
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl GroupReporter for NullReporter {
    fn on_group(&mut self, _header: &GroupHeader) {}
    fn on_member(&mut self, _member: &ResolvedMember) {}
}

/// Applies the keep/skip/delete policy to duplicate groups.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    golden: Option<PathBuf>,
    purge: bool,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Resolver {
    /// Create a resolver protecting `golden`.
    #[must_use]
    pub fn new(golden: Option<PathBuf>) -> Self {
        Self {
            golden,
            ..Default::default()
        }
    }

    /// Create a resolver from validated roots.
    #[must_use]
    pub fn from_roots(roots: &Roots) -> Self {
        Self::new(roots.golden().map(Path::to_path_buf))
    }

    /// Delete `Delete` members instead of only reporting them.
    #[must_use]
    pub fn with_purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Resolve every group, deleting redundant work copies when purging.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Inconsistent`] if a per-group check or the final
    ///   `keep + skip + to_delete == total` check fails
    /// - [`ResolveError::Interrupted`] if the shutdown flag is raised between
    ///   groups; files already deleted stay deleted
    pub fn resolve<R>(
        &self,
        groups: Vec<DuplicateGroup>,
        reporter: &mut R,
    ) -> Result<Stats, ResolveError>
    where
        R: GroupReporter + ?Sized,
    {
        let golden = self.golden.as_deref();
        let mut stats = Stats {
            total: groups.iter().map(DuplicateGroup::len).sum(),
            ..Stats::default()
        };

        for (index, group) in order_groups(groups).into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::debug!("Resolution: shutdown requested before group {}", index + 1);
                return Err(ResolveError::Interrupted);
            }

            let count = group.len();
            let size = group.size;
            let prefix = common_dir_prefix(&group.paths);
            let members = order_members(group.paths, golden);
            let tags = classify(&members);
            let unreadable_keeper = members
                .first()
                .filter(|keeper| !keeper.is_readable())
                .map(|keeper| keeper.path.clone());
            if let (true, Some(keeper)) = (self.purge, &unreadable_keeper) {
                log::warn!(
                    "Keeper {} is unreadable, group {} will not be purged",
                    keeper.display(),
                    index + 1
                );
            }
            stats.record(&tags);
            check_group(index + 1, count, &tags)?;

            reporter.on_group(&GroupHeader {
                position: index + 1,
                count,
                size,
                prefix: prefix.clone(),
            });

            for (i, (member, tag)) in members.into_iter().zip(tags).enumerate() {
                let mut resolved = ResolvedMember {
                    position: i + 1,
                    display: display_relative(&member.path, &prefix),
                    path: member.path,
                    tag,
                    mtime: member.mtime,
                    deletion: Deletion::NotAttempted,
                };

                if !(self.purge && tag == Tag::Delete) {
                    reporter.on_member(&resolved);
                    continue;
                }

                let outcome = match &unreadable_keeper {
                    Some(keeper) => Err(DeleteError::KeeperUnavailable {
                        path: resolved.path.clone(),
                        keeper: keeper.clone(),
                    }),
                    None => delete_file(&resolved.path),
                };

                match outcome {
                    Ok(_) => {
                        stats.deleted += 1;
                        resolved.deletion = Deletion::Deleted;
                        reporter.on_member(&resolved);
                        reporter.on_deleted(&resolved);
                    }
                    Err(e) => {
                        log::warn!("Failed to delete {}: {}", resolved.path.display(), e);
                        stats.failed += 1;
                        resolved.deletion = Deletion::Failed(e.to_string());
                        reporter.on_member(&resolved);
                        reporter.on_delete_failed(&resolved, &e);
                    }
                }
            }
        }

        if !stats.is_consistent() {
            return Err(ResolveError::Inconsistent(format!(
                "{} duplicate files but keep {} + skip {} + delete {} = {}",
                stats.total,
                stats.keep,
                stats.skip,
                stats.to_delete,
                stats.keep + stats.skip + stats.to_delete
            )));
        }

        log::info!("{}", stats);
        Ok(stats)
    }
}

/// Redundant per-group checks run before any member of the group is touched.
fn check_group(position: usize, count: usize, tags: &[Tag]) -> Result<(), ResolveError> {
    if tags.len() != count {
        return Err(ResolveError::Inconsistent(format!(
            "group {position}: {} tags for {count} files",
            tags.len()
        )));
    }
    if tags.iter().all(|t| *t == Tag::Delete) {
        return Err(ResolveError::Inconsistent(format!(
            "group {position}: every copy tagged for deletion"
        )));
    }
    if count < 2 {
        return Err(ResolveError::Inconsistent(format!(
            "group {position}: only {count} file(s)"
        )));
    }
    Ok(())
}

/// Resolve `groups` against an optional golden root.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve<R>(
    groups: Vec<DuplicateGroup>,
    golden: Option<&Path>,
    purge: bool,
    reporter: &mut R,
) -> Result<Stats, ResolveError>
where
    R: GroupReporter + ?Sized,
{
    Resolver::new(golden.map(Path::to_path_buf))
        .with_purge(purge)
        .resolve(groups, reporter)
}
