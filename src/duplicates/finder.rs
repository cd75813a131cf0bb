//! Duplicate finder: the three-stage progressive filter.
//!
//! # Overview
//!
//! The finder narrows a candidate set down to content-identical groups
//! without hashing every byte of every file:
//!
//! 1. **By Size** - bucket by file length (metadata only)
//! 2. **By CRC** - bucket by Adler-32 of the first 1 KiB
//! 3. **By Hash** - bucket by SHA-256 of the whole content
//!
//! Each stage is [`run_stage`](super::stage::run_stage) with a different key
//! function, so unique files drop out as early and cheaply as possible.
//!
//! # Example
//!
//! ```no_run
//! use dupurge::duplicates::{DuplicateFinder, FinderConfig};
//! use dupurge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let paths: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.detect(paths).unwrap();
//!
//! println!("{} groups, {} wasted bytes", groups.len(), summary.wasted_space);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::stage::{run_stage, Stage, StageOutcome, StageStats};
use super::DuplicateGroup;
use crate::progress::ProgressCallback;
use crate::scanner::{HashError, Hasher};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Base for the per-stage carry-forward limits; `None` means unbounded.
    pub top: Option<usize>,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("top", &self.top)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the carry-forward limit base.
    #[must_use]
    pub fn with_top(mut self, top: Option<usize>) -> Self {
        self.top = top;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a detection run.
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    /// Number of candidate files fed into the first stage
    pub total_files: usize,
    /// Per-stage counters, in pipeline order
    pub stages: Vec<(Stage, StageStats)>,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of files in confirmed groups
    pub duplicate_files: usize,
    /// Space held by redundant copies
    pub wasted_space: u64,
    /// Wall time spent in detection
    pub duration: Duration,
}

impl DetectionSummary {
    /// Counters for one stage, if it ran.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageStats> {
        self.stages.iter().find(|(s, _)| *s == stage).map(|(_, st)| st)
    }
}

/// Errors that can occur during duplicate detection.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The run was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Detection interrupted by user")]
    Interrupted,

    /// A stage key could not be computed for a file.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Duplicate finder that runs the three-stage pipeline.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the key extractor.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Find groups of content-identical files among `paths`.
    ///
    /// Input order matters: it fixes bucket order and member order, so the
    /// same input always yields the same groups in the same order.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Hash`] if any file cannot be measured or read. A
    ///   partial result would be misleading, so the whole run fails.
    /// - [`FinderError::Interrupted`] if the shutdown flag is raised.
    pub fn detect(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<(Vec<DuplicateGroup>, DetectionSummary), FinderError> {
        let start = Instant::now();
        let candidates: Vec<PathBuf> = paths.into_iter().collect();
        let mut summary = DetectionSummary {
            total_files: candidates.len(),
            ..Default::default()
        };

        log::info!("Checking {} files for duplicates", candidates.len());

        let mut sizes: HashMap<PathBuf, u64> = HashMap::new();
        let by_size = self.run(Stage::BySize, candidates, |path| {
            let size = self.hasher.size(path)?;
            sizes.insert(path.to_path_buf(), size);
            Ok(size)
        })?;
        summary.stages.push((Stage::BySize, by_size.stats.clone()));

        let by_crc = self.run(Stage::ByPartialChecksum, by_size.into_candidates(), |path| {
            Ok(self.hasher.partial_checksum(path)?)
        })?;
        summary
            .stages
            .push((Stage::ByPartialChecksum, by_crc.stats.clone()));

        let by_hash = self.run(Stage::ByFullHash, by_crc.into_candidates(), |path| {
            Ok(self.hasher.full_digest(path)?)
        })?;
        summary
            .stages
            .push((Stage::ByFullHash, by_hash.stats.clone()));

        let groups: Vec<DuplicateGroup> = by_hash
            .buckets
            .into_iter()
            .map(|bucket| {
                let size = bucket
                    .paths
                    .first()
                    .and_then(|p| sizes.get(p))
                    .copied()
                    .unwrap_or_default();
                DuplicateGroup::new(bucket.key, size, bucket.paths)
            })
            .collect();

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::len).sum();
        summary.wasted_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.duration = start.elapsed();

        log::info!(
            "Detection complete: {} groups, {} files, {} bytes reclaimable in {:.2?}",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.wasted_space,
            summary.duration
        );

        Ok((groups, summary))
    }

    /// Run one stage with progress reporting and shutdown checks around the key.
    fn run<K, F>(
        &self,
        stage: Stage,
        candidates: Vec<PathBuf>,
        mut key_fn: F,
    ) -> Result<StageOutcome<K>, FinderError>
    where
        K: Eq + std::hash::Hash + Clone,
        F: FnMut(&Path) -> Result<K, FinderError>,
    {
        let label = stage.label();
        let limit = stage.carry_forward_limit(self.config.top);
        let callback = self.config.progress_callback.as_ref();

        if let Some(cb) = callback {
            cb.on_phase_start(label, candidates.len());
        }

        let mut processed = 0usize;
        let outcome = run_stage(
            candidates,
            |path| {
                if self.config.is_shutdown_requested() {
                    log::debug!("{}: shutdown requested after {} files", label, processed);
                    return Err(FinderError::Interrupted);
                }
                let key = key_fn(path)?;
                processed += 1;
                if let Some(cb) = callback {
                    cb.on_progress(processed, &path.to_string_lossy());
                }
                Ok(key)
            },
            limit,
        );

        if let Some(cb) = callback {
            cb.on_phase_end(label);
        }
        let outcome = outcome?;

        let stats = &outcome.stats;
        log::info!(
            "{}: {} files checked, {} duplicates found ({} files)",
            label,
            stats.input_files,
            stats.duplicate_keys,
            stats.duplicate_files
        );
        log::debug!(
            "{}: {} eliminated ({:.1}%), {} carried forward",
            label,
            stats.eliminated,
            stats.elimination_rate(),
            stats.carried_forward
        );
        if stats.dropped_by_limit > 0 {
            log::debug!(
                "{}: carry-forward limit {:?} dropped {} files",
                label,
                limit,
                stats.dropped_by_limit
            );
        }

        Ok(outcome)
    }
}

/// Detect duplicate groups among `paths` with default settings.
///
/// # Errors
///
/// See [`DuplicateFinder::detect`].
pub fn detect(paths: impl IntoIterator<Item = PathBuf>) -> Result<Vec<DuplicateGroup>, FinderError> {
    DuplicateFinder::with_defaults()
        .detect(paths)
        .map(|(groups, _)| groups)
}
