//! Command-line interface definitions for dupfold.
//!
//! One positional argument names the source tree; the verbosity
//! flags only affect logging.
//!
//! # Example
//!
//! ```bash
//! # Fold ./backups into ./dest_files
//! mkdir dest_files && dupfold ./backups
//!
//! # Same, with debug logging
//! dupfold -v ./backups
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Fold duplicate files from a directory tree into a flat destination.
///
/// Tracked files are grouped by size, same-size files are compared by
/// BLAKE3 hash, and the result is copied into `dest_files`, which must
/// already exist in the working directory.
#[derive(Debug, Parser)]
#[command(name = "dupfold")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory to scan for duplicates
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,
}
