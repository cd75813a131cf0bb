//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The generic filter stage ([`stage::run_stage`])
//! - The three-stage pipeline: By Size, By CRC, By Hash ([`finder`])
//! - Confirmed duplicate groups ([`groups`])

pub mod finder;
pub mod groups;
pub mod stage;

pub use finder::{detect, DetectionSummary, DuplicateFinder, FinderConfig, FinderError};
pub use groups::DuplicateGroup;
pub use stage::{run_stage, Bucket, Stage, StageOutcome, StageStats};
