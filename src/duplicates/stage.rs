//! A single stage of the progressive duplicate filter.
//!
//! # Overview
//!
//! Every stage does the same thing with a different key:
//!
//! 1. Partition the candidates into buckets by key, computed once per file.
//!    Buckets keep first-seen key order; members keep encounter order.
//! 2. Drop singleton buckets; those files are proven unique.
//! 3. Stably sort the survivors by bucket size, largest first.
//! 4. If a carry-forward limit is set, keep buckets until that many members
//!    have been carried forward.
//!
//! [`run_stage`] is a pure function over a key function, so it can be driven
//! with synthetic keys in tests.
//!
//! # Example
//!
//! ```
//! use dupurge::duplicates::stage::run_stage;
//! use std::path::{Path, PathBuf};
//!
//! let candidates: Vec<PathBuf> = ["a.1", "b.2", "c.1", "d.3"]
//!     .iter()
//!     .map(PathBuf::from)
//!     .collect();
//!
//! // Key on the extension instead of touching the filesystem.
//! let key = |p: &Path| -> Result<String, std::convert::Infallible> {
//!     Ok(p.extension().unwrap().to_string_lossy().into_owned())
//! };
//!
//! let outcome = run_stage(candidates, key, None).unwrap();
//! assert_eq!(outcome.buckets.len(), 1);
//! assert_eq!(outcome.stats.eliminated, 2);
//! assert_eq!(outcome.into_candidates(), vec![PathBuf::from("a.1"), PathBuf::from("c.1")]);
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// The three filter stages, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// File length from metadata.
    BySize,
    /// Adler-32 over the first 1 KiB.
    ByPartialChecksum,
    /// SHA-256 over the whole file.
    ByFullHash,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 3] = [Stage::BySize, Stage::ByPartialChecksum, Stage::ByFullHash];

    /// Human-readable label used in progress output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BySize => "By Size",
            Self::ByPartialChecksum => "By CRC",
            Self::ByFullHash => "By Hash",
        }
    }

    /// Carry-forward limit for this stage given the optional `top` setting.
    ///
    /// `top = n` caps the size stage at `n * n` members and the checksum stage
    /// at `n * 2`. The final stage is never capped. `None` or `0` means
    /// unbounded.
    #[must_use]
    pub fn carry_forward_limit(self, top: Option<usize>) -> Option<usize> {
        let top = top.filter(|&t| t > 0)?;
        match self {
            Self::BySize => Some(top.saturating_mul(top)),
            Self::ByPartialChecksum => Some(top.saturating_mul(2)),
            Self::ByFullHash => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Paths sharing one key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<K> {
    /// The shared key
    pub key: K,
    /// Members in encounter order
    pub paths: Vec<PathBuf>,
}

impl<K> Bucket<K> {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if the bucket has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Statistics for one stage run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Files that entered the stage
    pub input_files: usize,
    /// Distinct keys seen
    pub buckets: usize,
    /// Files proven unique (singleton buckets)
    pub eliminated: usize,
    /// Keys shared by two or more files
    pub duplicate_keys: usize,
    /// Files in buckets of two or more
    pub duplicate_files: usize,
    /// Files carried into the next stage
    pub carried_forward: usize,
    /// Files dropped by the carry-forward limit
    pub dropped_by_limit: usize,
}

impl StageStats {
    /// Percentage of input files eliminated by this stage.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            (self.eliminated as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Result of a stage: the surviving buckets and their statistics.
#[derive(Debug, Clone)]
pub struct StageOutcome<K> {
    /// Surviving buckets (2+ members), largest first
    pub buckets: Vec<Bucket<K>>,
    /// Counters for this stage
    pub stats: StageStats,
}

impl<K> StageOutcome<K> {
    /// Flatten the surviving buckets, in order, into the next candidate set.
    #[must_use]
    pub fn into_candidates(self) -> Vec<PathBuf> {
        self.buckets.into_iter().flat_map(|b| b.paths).collect()
    }
}

/// Partition candidates into buckets by key.
///
/// Keys are computed exactly once per path. Bucket order is the order in which
/// keys were first seen.
///
/// # Errors
///
/// Returns the first error produced by `key_fn`; no partial result is kept.
pub fn partition<K, E, F>(candidates: Vec<PathBuf>, mut key_fn: F) -> Result<Vec<Bucket<K>>, E>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Path) -> Result<K, E>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<K>> = Vec::new();

    for path in candidates {
        let key = key_fn(&path)?;
        match index.get(&key) {
            Some(&slot) => buckets[slot].paths.push(path),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    key,
                    paths: vec![path],
                });
            }
        }
    }

    Ok(buckets)
}

/// Run one filter stage over `candidates`.
///
/// # Arguments
///
/// * `candidates` - Paths still in the running
/// * `key_fn` - Stage key extraction, called once per path
/// * `limit` - Optional carry-forward member budget
///
/// # Errors
///
/// Returns the first error produced by `key_fn`.
pub fn run_stage<K, E, F>(
    candidates: Vec<PathBuf>,
    key_fn: F,
    limit: Option<usize>,
) -> Result<StageOutcome<K>, E>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Path) -> Result<K, E>,
{
    let mut stats = StageStats {
        input_files: candidates.len(),
        ..Default::default()
    };

    let buckets = partition(candidates, key_fn)?;
    stats.buckets = buckets.len();

    let mut survivors: Vec<Bucket<K>> = buckets.into_iter().filter(|b| b.len() > 1).collect();
    stats.duplicate_keys = survivors.len();
    stats.duplicate_files = survivors.iter().map(Bucket::len).sum();
    stats.eliminated = stats.input_files - stats.duplicate_files;

    // Stable: equal-sized buckets keep first-seen order.
    survivors.sort_by_key(|b| Reverse(b.len()));

    if let Some(limit) = limit {
        let mut kept = 0usize;
        let mut cut = survivors.len();
        for (i, bucket) in survivors.iter().enumerate() {
            if kept >= limit {
                cut = i;
                break;
            }
            kept += bucket.len();
        }
        let dropped: usize = survivors.drain(cut..).map(|b| b.len()).sum();
        stats.dropped_by_limit = dropped;
    }

    stats.carried_forward = survivors.iter().map(Bucket::len).sum();

    Ok(StageOutcome {
        buckets: survivors,
        stats,
    })
}
