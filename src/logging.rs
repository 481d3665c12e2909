//! Logging infrastructure for dupfold.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! # Format
//!
//! Records are written as `LEVEL message`. With `-v` or `-vv` each line is
//! prefixed with a millisecond timestamp so phase durations can be read off
//! the log.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupfold::logging::init_logging;
//!
//! // -v on the command line
//! init_logging(1, false);
//! log::debug!("Debug info here");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Must be called once, before any logging calls are made.
///
/// # Panics
///
/// Panics if called more than once, as `env_logger` can only be
/// initialized once per process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    let source = match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
            format!("RUST_LOG={filters}")
        }
        Err(_) => {
            let level = determine_level(verbose, quiet);
            builder.filter_level(level);
            format!("command-line flags ({level})")
        }
    };

    configure_format(&mut builder, verbose);
    builder.init();

    log::debug!("Logging initialized from {}", source);
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// One line per record: `LEVEL message`, prefixed with a millisecond
/// timestamp once `-v` is given.
fn configure_format(builder: &mut Builder, verbose: u8) {
    let timestamps = verbose > 0;
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if timestamps {
            let timestamp = buf.timestamp_millis();
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        } else {
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        }
    });
}
