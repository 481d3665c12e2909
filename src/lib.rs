//! dupfold - Fold duplicate files into a flat destination
//!
//! Walks a directory tree, groups allow-listed files by size, confirms
//! duplicates with BLAKE3 content hashes, and copies the result into a
//! pre-existing destination directory.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod scanner;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::{Config, DESTINATION};
use crate::error::ExitCode;
use crate::pipeline::Pipeline;
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error naming the failing path for any fatal walk, hash, or
/// copy failure.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load();
    log::debug!("Configuration: {:?}", config);

    let pipeline = Pipeline::new(config.extension_filter(), Path::new(DESTINATION))
        .with_progress_callback(Arc::new(Progress::new(cli.quiet)));

    let summary = pipeline
        .run(&cli.root)
        .with_context(|| format!("dedup of {} aborted", cli.root.display()))?;

    if !cli.quiet {
        println!("{}", summary.display());
    }

    Ok(ExitCode::Success)
}
