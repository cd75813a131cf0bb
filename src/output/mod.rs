//! Output for resolution results.
//!
//! Only the plain-text report exists: one block per duplicate group followed
//! by the statistics summary.
//!
//! # Example
//!
//! ```no_run
//! use dupurge::duplicates::detect;
//! use dupurge::output::TextReporter;
//! use dupurge::resolution::resolve;
//! use std::path::PathBuf;
//!
//! let groups = detect(vec![PathBuf::from("a"), PathBuf::from("b")]).unwrap();
//! let mut reporter = TextReporter::new(std::io::stdout(), false);
//! let stats = resolve(groups, None, false, &mut reporter).unwrap();
//! println!("{stats}");
//! ```

pub mod report;

// Re-export main types
pub use report::{
    format_elapsed, format_mtime, format_size, write_cleanup, write_roots, write_summary,
    TextReporter,
};
