//! Path normalization and root membership utilities.
//!
//! Golden/work membership is decided by component-wise prefix comparison on
//! absolute, lexically cleaned, NFC-normalized paths. NFC matters because
//! macOS hands out NFD file names while users type NFC on the command line:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! # Example
//!
//! ```
//! use dupurge::scanner::path_utils::{is_under, normalize_path_str};
//! use std::path::Path;
//!
//! assert_eq!(normalize_path_str("cafe\u{0301}"), normalize_path_str("café"));
//! assert!(is_under(Path::new("/data/golden/a.txt"), Path::new("/data/golden")));
//! assert!(!is_under(Path::new("/data/golden2/a.txt"), Path::new("/data/golden")));
//! ```

use std::io;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Normalize a [`Path`] to NFC form.
///
/// If the path contains invalid UTF-8, returns the original path unchanged.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use dupurge::scanner::path_utils::normalize_pathbuf;
///
/// let path = PathBuf::from("documents/cafe\u{0301}.txt");
/// assert_eq!(normalize_pathbuf(&path), PathBuf::from("documents/café.txt"));
/// ```
#[must_use]
pub fn normalize_pathbuf(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(normalize_path_str(s)),
        None => path.to_path_buf(),
    }
}

/// Make a path absolute and lexically clean it.
///
/// `.` components are dropped and `..` pops the previous component. Symlinks
/// are not resolved, so a root that does not exist yet still normalizes. The
/// bytes of each component are kept as-is so the result can still be opened;
/// use [`is_under`] for Unicode-insensitive comparison.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined for a
/// relative path.
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut cleaned = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    Ok(cleaned)
}

/// Check whether `path` equals `root` or lies beneath it.
///
/// Both sides are NFC-normalized and compared component by component, so
/// `/data/golden2` is not under `/data/golden`. On Windows the comparison is
/// case-insensitive.
#[must_use]
pub fn is_under(path: &Path, root: &Path) -> bool {
    let path = normalize_pathbuf(path);
    let root = normalize_pathbuf(root);

    if cfg!(windows) {
        let p = PathBuf::from(path.to_string_lossy().to_lowercase());
        let r = PathBuf::from(root.to_string_lossy().to_lowercase());
        p.starts_with(r)
    } else {
        path.starts_with(root)
    }
}

/// Directory part of the longest common string prefix of `paths`.
///
/// Returns an empty string when the shared directory is the filesystem root
/// or when the paths share no directory at all.
///
/// # Example
///
/// ```
/// use dupurge::scanner::path_utils::common_dir_prefix;
/// use std::path::PathBuf;
///
/// let paths = vec![PathBuf::from("/w/photos/a1.jpg"), PathBuf::from("/w/photos/a2.jpg")];
/// assert_eq!(common_dir_prefix(&paths), "/w/photos");
/// ```
#[must_use]
pub fn common_dir_prefix(paths: &[PathBuf]) -> String {
    let strings: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let Some(first) = strings.first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for other in &strings[1..] {
        prefix_len = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((idx, a), _)| idx + a.len_utf8())
            .min(prefix_len);
    }

    let prefix = &first[..prefix_len];
    match prefix.rfind(MAIN_SEPARATOR) {
        Some(idx) if idx > 0 => prefix[..idx].to_string(),
        _ => String::new(),
    }
}

/// Display form of `path` relative to a prefix from [`common_dir_prefix`].
#[must_use]
pub fn display_relative(path: &Path, prefix: &str) -> String {
    let full = path.to_string_lossy();
    let rest = full.strip_prefix(prefix).unwrap_or(&full);
    rest.trim_start_matches(MAIN_SEPARATOR).trim().to_string()
}
