//! Stage key extraction: file size, partial checksum and full digest.
//!
//! # Overview
//!
//! The [`Hasher`] computes the three keys used by the progressive filter:
//!
//! 1. **Size** - taken from filesystem metadata, no content read
//! 2. **Partial checksum** - Adler-32 over the first [`PARTIAL_CHECKSUM_SIZE`] bytes
//! 3. **Full digest** - SHA-256 over the whole content, streamed in
//!    [`HASH_CHUNK_SIZE`] chunks so memory stays bounded for any file size
//!
//! # Example
//!
//! ```no_run
//! use dupurge::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let path = Path::new("photo.jpg");
//!
//! let size = hasher.size(path)?;
//! let checksum = hasher.partial_checksum(path)?;
//! let digest = hasher.full_digest(path)?;
//! println!("{size} {checksum:08x} {}", dupurge::scanner::digest_to_hex(&digest));
//! # Ok::<(), dupurge::scanner::HashError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

use adler::Adler32;
use sha2::{Digest as _, Sha256};

use super::HashError;

/// Number of leading bytes covered by the partial checksum.
pub const PARTIAL_CHECKSUM_SIZE: u64 = 1024;

/// Read chunk size for the streaming full digest.
pub const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// SHA-256 digest of a file's full content.
pub type Digest = [u8; 32];

/// Key extractor for the detection stages.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher using [`HASH_CHUNK_SIZE`] reads.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: HASH_CHUNK_SIZE,
        }
    }

    /// Override the streaming chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Current streaming chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// File length in bytes, from metadata.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file vanished or its metadata is unreadable.
    pub fn size(&self, path: &Path) -> Result<u64, HashError> {
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Adler-32 checksum of the first 1 KiB of the file.
    ///
    /// Files shorter than [`PARTIAL_CHECKSUM_SIZE`] are checksummed whole.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn partial_checksum(&self, path: &Path) -> Result<u32, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;

        let mut head = Vec::with_capacity(PARTIAL_CHECKSUM_SIZE as usize);
        file.take(PARTIAL_CHECKSUM_SIZE)
            .read_to_end(&mut head)
            .map_err(|e| HashError::from_io(path, e))?;

        let mut adler = Adler32::new();
        adler.write_slice(&head);
        let checksum = adler.checksum();

        log::trace!(
            "Partial checksum {:08x} over {} bytes: {}",
            checksum,
            head.len(),
            path.display()
        );
        Ok(checksum)
    }

    /// SHA-256 digest of the full file content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn full_digest(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            hasher.update(&buffer[..read]);
            total += read as u64;
        }

        log::trace!("Full digest over {} bytes: {}", total, path.display());
        Ok(hasher.finalize().into())
    }
}

/// Render a digest as lowercase hexadecimal.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
