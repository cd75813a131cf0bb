//! Command-line interface definitions for dupurge.
//!
//! This module defines all CLI arguments using the clap derive API. There are
//! no subcommands: a run always detects duplicates in the work tree (and the
//! golden tree, when given) and optionally purges them.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates inside ~/Photos, change nothing
//! dupurge -w ~/Photos
//!
//! # Delete copies in ~/Inbox that already exist in ~/Archive
//! dupurge -g ~/Archive -w ~/Inbox --purge
//!
//! # Verbose mode for debugging
//! dupurge -vv -w ~/Photos
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Find duplicates in both `work` and `golden` folders.
///
/// With --purge, only the duplicates in the `work` folder are removed. The
/// oldest file is kept; files in `golden` are never modified.
#[derive(Debug, Parser)]
#[command(name = "dupurge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Work folder that will be stripped of duplicates found in itself and `golden`
    #[arg(short, long, value_name = "PATH")]
    pub work: PathBuf,

    /// (optional) Folder searched for duplicates but never modified
    #[arg(short, long, value_name = "PATH")]
    pub golden: Option<PathBuf>,

    /// Delete extra copies from the `work` folder
    ///
    /// If all copies are under work, the one with the oldest modification
    /// time is preserved. All copies in golden are preserved.
    #[arg(short, long)]
    pub purge: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip hidden files and directories (any path component starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Skip zero-length files
    #[arg(long)]
    pub skip_empty: bool,

    /// Cap how many candidates each stage carries forward (N*N by size, N*2 by checksum)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Do not remove directories left empty after a purge
    #[arg(long)]
    pub no_cleanup: bool,

    /// Load settings from this TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to this TOML file before scanning
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Print fatal errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// This is a convenience wrapper around `Parser::parse()`.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
