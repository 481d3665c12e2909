//! Directory walker that builds the size-keyed corpus.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a source tree
//! and collecting every allow-listed regular file into a [`Corpus`].
//! It uses [`walkdir`] for a single-threaded, depth-first traversal with
//! children sorted by file name, so the corpus is identical across runs.
//!
//! # Error policy
//!
//! - A root that is missing or not a directory aborts before any work.
//! - Traversal errors below the root (unreadable directory, entry that
//!   vanished mid-walk) are logged and skipped.
//! - A tracked file that cannot be opened or stat-ed aborts the walk.
//!
//! # Example
//!
//! ```no_run
//! use dupfold::scanner::{ExtensionFilter, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/backups"), ExtensionFilter::new(["bin"]));
//! let corpus = walker.build_corpus().unwrap();
//! println!("Tracked {} files", corpus.seen.len());
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{Corpus, ExtensionFilter, ScanError};
use crate::progress::ProgressCallback;

/// Directory walker for corpus construction.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Extensions that qualify a file for tracking
    filter: ExtensionFilter,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given root and extension allow-list.
    #[must_use]
    pub fn new(root: &Path, filter: ExtensionFilter) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Root directory this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and build the corpus.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root is missing or not a directory, or
    /// if a tracked file cannot be opened or its metadata cannot be read.
    pub fn build_corpus(&self) -> Result<Corpus, ScanError> {
        self.validate_root()?;

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walking", 0);
        }

        log::info!("Walking {}", self.root.display());

        let mut corpus = Corpus::default();
        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry_result in walk {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    // The root itself failing means traversal never started
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk failed"));
                        return Err(self.handle_io_error(&self.root, source));
                    }
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    corpus.stats.traversal_errors += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                log::trace!("Skipping non-regular entry: {}", entry.path().display());
                corpus.stats.skipped_special += 1;
                continue;
            }

            corpus.stats.files_visited += 1;
            let path = entry.into_path();

            if !self.filter.matches(&path) {
                log::trace!("Skipping file due to extension filter: {}", path.display());
                corpus.stats.filtered_out += 1;
                continue;
            }

            let size = self.file_size(&path)?;
            log::debug!("Tracking {} ({} bytes)", path.display(), size);

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(corpus.seen.len() + 1, &path.to_string_lossy());
            }
            corpus.record(path, size);
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walking");
        }

        log::info!(
            "Walk complete: {} tracked, {} filtered out, {} traversal error(s)",
            corpus.seen.len(),
            corpus.stats.filtered_out,
            corpus.stats.traversal_errors
        );

        Ok(corpus)
    }

    fn validate_root(&self) -> Result<(), ScanError> {
        let metadata =
            fs::metadata(&self.root).map_err(|e| self.handle_io_error(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Read a file's size from the metadata of an open handle.
    fn file_size(&self, path: &Path) -> Result<u64, ScanError> {
        let file = File::open(path).map_err(|e| self.handle_io_error(path, e))?;
        let metadata = file.metadata().map_err(|e| self.handle_io_error(path, e))?;
        Ok(metadata.len())
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
