//! Scanner module for file enumeration and key extraction.
//!
//! This module provides functionality for:
//! - Directory walking using walkdir (symlinks always excluded)
//! - Stage keys: file size, Adler-32 partial checksum, SHA-256 full digest
//! - Unicode path normalization for root membership checks
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Partial checksum and streaming SHA-256 digest
//! - [`path_utils`]: Absolute/NFC path normalization and prefix checks
//!
//! # Example
//!
//! ```no_run
//! use dupurge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     include_hidden: false,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{digest_to_hex, Digest, Hasher, HASH_CHUNK_SIZE, PARTIAL_CHECKSUM_SIZE};
pub use walker::Walker;

/// Configuration for directory walking.
///
/// Symbolic links are never followed nor yielded, so there is no switch for
/// them here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Include paths with a dot-prefixed component.
    pub include_hidden: bool,

    /// Include zero-length files.
    pub include_empty: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            include_empty: true,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `include_hidden` - Whether to yield hidden files
    /// * `include_empty` - Whether to yield zero-length files
    #[must_use]
    pub fn new(include_hidden: bool, include_empty: bool) -> Self {
        Self {
            include_hidden,
            include_empty,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while extracting a stage key from a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file whose key could not be extracted.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
