//! File actions module.
//!
//! This module provides functionality for:
//! - Permanent deletion of a single redundant copy ([`delete`])
//! - Bottom-up removal of directories left empty by a purge ([`cleanup`])
//!
//! ```no_run
//! use dupurge::actions::delete::delete_file;
//! use std::path::Path;
//!
//! let result = delete_file(Path::new("/path/to/duplicate.txt"));
//! ```

pub mod cleanup;
pub mod delete;

// Re-export commonly used types
pub use cleanup::{remove_empty_dirs, CleanupResult};
pub use delete::{delete_file, DeleteError, DeleteResult};
