//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sorted, single-threaded directory walking using walkdir
//! - Extension allow-list filtering
//! - Size-keyed corpus construction
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and corpus building
//! - [`corpus`]: The size buckets and seen set produced by the walk
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupfold::scanner::{ExtensionFilter, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), ExtensionFilter::new(["bin"]));
//! let corpus = walker.build_corpus().unwrap();
//! for (size, paths) in corpus.sizes.iter() {
//!     println!("{} bytes: {} file(s)", size, paths.len());
//! }
//! ```

pub mod corpus;
pub mod hasher;
pub mod walker;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// Re-export main types
pub use corpus::{Corpus, SeenSet, SizeCorpus, WalkStats};
pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::Walker;

/// Set of filename extensions a file must carry to be tracked.
///
/// Files whose extension is not in the set are invisible to every phase.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Create a filter from a list of extensions (without the leading dot).
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether an extension is allow-listed.
    #[must_use]
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Check whether a path's file name carries an allow-listed extension.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.contains(extension_of(&name.to_string_lossy())))
    }

    /// Iterate the allow-listed extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Number of allow-listed extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check whether the allow-list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Extract the extension of a file name: everything after the last `.`.
///
/// A name without any `.` yields the whole name, so `README` has the
/// "extension" `README` and `archive.` has the empty extension.
///
/// ```
/// use dupfold::scanner::extension_of;
///
/// assert_eq!(extension_of("disk.img.bin"), "bin");
/// assert_eq!(extension_of("bin"), "bin");
/// ```
#[must_use]
pub fn extension_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(_, extension)| extension)
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

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

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

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
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
