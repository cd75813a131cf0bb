//! Human-readable report of duplicate groups and run statistics.
//!
//! # Layout
//!
//! ```text
//! files unchanged (golden) in: /data/golden
//! searching and removing duplicates in: /data/work
//!
//! (1) Found 3 duplicate files (size: 2.0 MiB) in '/data/':
//!  1:  K 'golden/a.jpg' [Sat Oct 17 09:05:01 2026]
//!  2:  S 'golden/copy/a.jpg' [Sat Oct 17 09:06:12 2026]
//!  3: *D 'work/a.jpg' [Sat Oct 17 10:00:00 2026] - DELETED
//! Total duplicates: 3, keep: 1, skipped (in golden): 1, deleted: 1/1
//! Complete in 0 minutes (2 sec.).
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use yansi::Paint;

use crate::resolution::{Deletion, GroupHeader, GroupReporter, ResolvedMember, Stats, Tag};

/// Timestamp layout matching C `ctime()`.
pub const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Format a modification time in local time, ctime style.
#[must_use]
pub fn format_mtime(mtime: &Result<SystemTime, String>) -> String {
    match mtime {
        Ok(t) => DateTime::<Local>::from(*t).format(CTIME_FORMAT).to_string(),
        Err(e) => e.clone(),
    }
}

/// Format a byte count for display.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Writes the per-group report as resolution proceeds.
pub struct TextReporter<W: Write> {
    out: W,
    color: bool,
    error: Option<io::Error>,
}

impl<W: Write> TextReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error: None,
        }
    }

    /// Return the writer, or the first write error encountered.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error raised while writing the report.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_fmt(line).and_then(|()| self.out.write_all(b"\n")) {
            log::warn!("Cannot write report: {}", e);
            self.error = Some(e);
        }
    }

    fn paint_tag(&self, tag: Tag) -> String {
        let marker = tag.marker();
        if !self.color {
            return marker.to_string();
        }
        match tag {
            Tag::Keep => marker.green().to_string(),
            Tag::Skip => marker.cyan().to_string(),
            Tag::Delete => marker.red().bold().to_string(),
        }
    }
}

impl<W: Write> GroupReporter for TextReporter<W> {
    fn on_group(&mut self, header: &GroupHeader) {
        self.emit(format_args!(
            "\n({}) Found {} duplicate files (size: {}) in '{}/':",
            header.position,
            header.count,
            format_size(header.size),
            header.prefix
        ));
    }

    fn on_member(&mut self, member: &ResolvedMember) {
        let suffix = match &member.deletion {
            Deletion::NotAttempted => String::new(),
            Deletion::Deleted => " - DELETED".to_string(),
            Deletion::Failed(message) => format!(" ERROR: {message}"),
        };
        let tag = self.paint_tag(member.tag);
        self.emit(format_args!(
            "{:2}: {} '{}' [{}]{}",
            member.position,
            tag,
            member.display,
            format_mtime(&member.mtime),
            suffix
        ));
    }
}

/// Write the opening lines naming the roots.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_roots<W: Write>(out: &mut W, work: &Path, golden: Option<&Path>) -> io::Result<()> {
    if let Some(golden) = golden {
        writeln!(out, "files unchanged (golden) in: {}", golden.display())?;
    }
    writeln!(out, "searching and removing duplicates in: {}", work.display())
}

/// Write the banner and one line per directory removed by cleanup.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_cleanup<W: Write>(out: &mut W, work: &Path, removed: &[std::path::PathBuf]) -> io::Result<()> {
    writeln!(out, "Deleting empty dir's in work ('{}')", work.display())?;
    for dir in removed {
        writeln!(out, "   empty directory removed: {}", dir.display())?;
    }
    Ok(())
}

/// Format the elapsed-time line.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("Complete in {} minutes ({} sec.).", secs / 60, secs)
}

/// Write the statistics line followed by the elapsed-time line.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_summary<W: Write>(out: &mut W, stats: &Stats, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "{stats}")?;
    writeln!(out, "{}", format_elapsed(elapsed))
}
