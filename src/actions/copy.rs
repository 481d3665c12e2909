//! Raw byte copy between two paths.
//!
//! The source is read fully and written to the destination, which is
//! created if absent and truncated if present. Both handles are scoped to
//! [`copy_file`] and released on every return path.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for copy operations.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Reading the source or writing the destination failed.
    #[error("failed to copy {source_path} to {destination}: {source}")]
    Io {
        /// File being copied
        source_path: PathBuf,
        /// Where it was being copied to
        destination: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The source path has no file name to place under the destination.
    #[error("cannot derive a destination name from {0}")]
    NoFileName(PathBuf),
}

impl CopyError {
    /// Source path involved in the failure.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        match self {
            Self::Io { source_path, .. } => source_path,
            Self::NoFileName(p) => p,
        }
    }

    /// Destination path involved in the failure (if one was computed).
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Io { destination, .. } => Some(destination),
            Self::NoFileName(_) => None,
        }
    }
}

/// Copy `source` to `destination`, returning the number of bytes written.
///
/// The destination's parent directory must already exist.
///
/// # Errors
///
/// Returns [`CopyError::Io`] naming both paths if the source cannot be
/// read or the destination cannot be created or written.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64, CopyError> {
    let wrap = |e: io::Error| CopyError::Io {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source: e,
    };

    let mut input = File::open(source).map_err(wrap)?;
    let mut output = File::create(destination).map_err(wrap)?;
    let written = io::copy(&mut input, &mut output).map_err(wrap)?;
    output.sync_all().map_err(wrap)?;

    log::trace!(
        "Copied {} bytes: {} -> {}",
        written,
        source.display(),
        destination.display()
    );
    Ok(written)
}
