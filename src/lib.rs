//! dupurge - duplicate file finder and purger
//!
//! Finds byte-identical files in a work tree and an optional golden tree
//! using a three-stage filter (size, Adler-32 of the first KiB, streamed
//! SHA-256), then keeps one copy per group and optionally deletes the
//! redundant copies in the work tree. Files under the golden tree are never
//! modified.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod resolution;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use crate::actions::remove_empty_dirs;
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use crate::error::ExitCode;
use crate::output::{write_cleanup, write_roots, write_summary, TextReporter};
use crate::progress::{Progress, ProgressCallback, PHASE_WALKING};
use crate::resolution::{check_roots, ResolveError, Resolver, Roots, Stats};
use crate::scanner::{Walker, WalkerConfig};
use crate::signal::ShutdownHandler;

/// Run the application, writing the report to stdout.
///
/// # Errors
///
/// Returns an error for invalid roots or configuration, unreadable files,
/// interruption, or a failed consistency check. Use
/// [`ExitCode::for_error`] to map it to a process exit code.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let color = !cli.no_color && io::stdout().is_terminal();
    if !color {
        yansi::disable();
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out, color)
}

/// Run the application, writing the uncoloured report to `out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_output<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<ExitCode> {
    run(cli, out, false)
}

fn run<W: Write>(cli: Cli, out: &mut W, color: bool) -> anyhow::Result<ExitCode> {
    let started = Instant::now();

    let config = Config::load(cli.config.as_deref())?.apply_cli(&cli);
    log::debug!("Effective config: {:?}", config);
    if let Some(path) = &cli.save_config {
        config.save_to(path)?;
        log::info!("Saved configuration to {}", path.display());
    }

    let roots = check_roots(&cli.work, cli.golden.as_deref())?;
    write_roots(out, roots.work(), roots.golden()).context("cannot write report")?;

    let shutdown = signal::install_handler()?;
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(!config.progress));

    let candidates = collect_candidates(&roots, &config, &shutdown, progress.as_ref());
    if shutdown.is_shutdown_requested() {
        return Err(FinderError::Interrupted.into());
    }

    let finder_config = FinderConfig::default()
        .with_top(config.top)
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(Arc::clone(&progress));
    let (groups, summary) = DuplicateFinder::new(finder_config).detect(candidates)?;
    log::debug!("Detection summary: {:?}", summary);

    let resolver = Resolver::from_roots(&roots)
        .with_purge(cli.purge)
        .with_shutdown_flag(shutdown.get_flag());
    let mut reporter = TextReporter::new(&mut *out, color);
    let stats = resolver.resolve(groups, &mut reporter)?;
    reporter.finish().context("cannot write report")?;

    check_outcome(&stats, cli.purge)?;

    if cli.purge && config.cleanup_empty_dirs {
        let cleanup = remove_empty_dirs(roots.work(), &config.marker_files, roots.golden());
        for (dir, reason) in &cleanup.failures {
            log::warn!("Cannot remove directory {}: {}", dir.display(), reason);
        }
        log::info!(
            "Removed {} empty directories ({} marker files)",
            cleanup.removed_count(),
            cleanup.removed_markers.len()
        );
        write_cleanup(out, roots.work(), &cleanup.removed_dirs).context("cannot write report")?;
    }

    write_summary(out, &stats, started.elapsed()).context("cannot write report")?;
    Ok(ExitCode::Success)
}

/// Enumerate work files, then golden files.
///
/// When the golden root lies inside the work root, the work walk skips it so
/// golden files are listed once. Walk errors are logged and skipped.
fn collect_candidates(
    roots: &Roots,
    config: &Config,
    shutdown: &ShutdownHandler,
    progress: &dyn ProgressCallback,
) -> Vec<PathBuf> {
    let walker_config = WalkerConfig::new(config.include_hidden, config.include_empty);
    let mut candidates = Vec::new();

    progress.on_phase_start(PHASE_WALKING, 0);

    let work = Walker::new(roots.work(), walker_config.clone()).with_shutdown_flag(shutdown.get_flag());
    for entry in work.walk() {
        match entry {
            Ok(path) if roots.is_golden(&path) => {}
            Ok(path) => {
                progress.on_progress(candidates.len() + 1, &path.to_string_lossy());
                candidates.push(path);
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    if let Some(golden) = roots.golden() {
        let walker = Walker::new(golden, walker_config).with_shutdown_flag(shutdown.get_flag());
        for entry in walker.walk() {
            match entry {
                Ok(path) => {
                    progress.on_progress(candidates.len() + 1, &path.to_string_lossy());
                    candidates.push(path);
                }
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    progress.on_phase_end(PHASE_WALKING);
    log::info!("Found {} files to check", candidates.len());
    candidates
}

/// Final post-condition over the run's statistics.
fn check_outcome(stats: &Stats, purge: bool) -> Result<(), ResolveError> {
    let attempted = stats.deleted + stats.failed;
    let expected = if purge { stats.to_delete } else { 0 };
    if attempted != expected || stats.deleted > stats.to_delete {
        return Err(ResolveError::Inconsistent(format!(
            "{} deleted + {} failed, expected {} deletion attempts",
            stats.deleted, stats.failed, expected
        )));
    }
    Ok(())
}
