//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module resolves the walk's size buckets into confirmed duplicates:
//! 1. **Phase 1 - Size grouping**: done by the walk (see [`crate::scanner::walker`])
//! 2. **Phase 2 - Full hash**: hash every file in a size bucket of 2+ files
//!    and group the paths by hash
//!
//! Files whose size is unique are never opened here. Equal size and equal
//! BLAKE3 hash are taken to mean equal content; there is no byte-by-byte
//! comparison afterwards.
//!
//! # Example
//!
//! ```no_run
//! use dupfold::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let scan = finder.find_duplicates(Path::new("/backups")).unwrap();
//!
//! for set in scan.hashes.iter() {
//!     println!("{}: {} copies", set.hash_hex(), set.len());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::HashCorpus;
use crate::progress::ProgressCallback;
use crate::scanner::{Corpus, ExtensionFilter, HashError, Hasher, ScanError, SizeCorpus, Walker};

/// Statistics from the hashing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Size buckets with 2+ files that were hashed
    pub buckets_hashed: usize,
    /// Files whose full content was hashed
    pub hashed_files: usize,
    /// Files never hashed because their size is unique
    pub unique_size_files: usize,
    /// Files whose hash turned out unique within their size bucket
    pub unique_hash_files: usize,
    /// Confirmed duplicate sets
    pub duplicate_sets: usize,
    /// Files beyond the first in each duplicate set
    pub duplicate_files: usize,
    /// Bytes taken by copies beyond the first
    pub wasted_space: u64,
}

/// Group same-size files by content hash (Phase 2).
///
/// Every size bucket with two or more paths is hashed in full; single-path
/// buckets are skipped. The returned corpus holds only hash buckets with
/// two or more paths.
///
/// # Errors
///
/// Returns the first [`HashError`] encountered; no partial result is kept.
///
/// # Example
///
/// ```no_run
/// use dupfold::duplicates::resolve_duplicates;
/// use dupfold::scanner::{Hasher, SizeCorpus};
/// use std::path::PathBuf;
///
/// let mut sizes = SizeCorpus::new();
/// sizes.insert(1, PathBuf::from("a.bin"));
/// sizes.insert(1, PathBuf::from("b.bin"));
///
/// let (hashes, stats) = resolve_duplicates(&sizes, &Hasher::new(), None).unwrap();
/// println!("{} duplicate set(s)", stats.duplicate_sets);
/// ```
pub fn resolve_duplicates(
    sizes: &SizeCorpus,
    hasher: &Hasher,
    progress: Option<&dyn ProgressCallback>,
) -> Result<(HashCorpus, ResolveStats), HashError> {
    let mut stats = ResolveStats {
        unique_size_files: sizes.unique_size_files(),
        ..Default::default()
    };
    let mut hashes = HashCorpus::new();

    let candidates: usize = sizes.candidate_buckets().map(|(_, paths)| paths.len()).sum();
    log::info!(
        "Hashing {} candidate file(s), skipping {} with a unique size",
        candidates,
        stats.unique_size_files
    );

    if let Some(callback) = progress {
        callback.on_phase_start("hashing", candidates);
    }

    for (size, paths) in sizes.candidate_buckets() {
        stats.buckets_hashed += 1;
        log::debug!("Size bucket {} bytes: {} file(s)", size, paths.len());

        for path in paths {
            let hash = hasher.full_hash(path)?;
            stats.hashed_files += 1;

            if let Some(callback) = progress {
                callback.on_progress(stats.hashed_files, &path.to_string_lossy());
            }
            hashes.insert(hash, size, path.clone());
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end("hashing");
    }

    let before = hashes.total_files();
    hashes.retain_duplicates();
    stats.unique_hash_files = before - hashes.total_files();
    stats.duplicate_sets = hashes.len();
    stats.duplicate_files = hashes.duplicate_files();
    stats.wasted_space = hashes.wasted_space();

    log::info!(
        "Hashing complete: {} duplicate set(s), {} extra cop(ies)",
        stats.duplicate_sets,
        stats.duplicate_files
    );

    Ok((hashes, stats))
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Extensions a file must carry to be tracked.
    pub filter: ExtensionFilter,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("filter", &self.filter)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            filter: ExtensionFilter::new(crate::config::DEFAULT_EXTENSIONS.iter().copied()),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the extension allow-list.
    #[must_use]
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The walk could not start or a tracked file could not be stat-ed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A candidate file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl FinderError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        match self {
            Self::Scan(e) => e.path().to_path_buf(),
            Self::Hash(HashError::NotFound(p) | HashError::PermissionDenied(p)) => p.clone(),
            Self::Hash(HashError::Io { path, .. }) => path.clone(),
        }
    }
}

/// Result of walking and resolving a source tree.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Size buckets, seen set, and walk statistics
    pub corpus: Corpus,
    /// Confirmed duplicate sets
    pub hashes: HashCorpus,
    /// Hashing statistics
    pub stats: ResolveStats,
}

/// Duplicate finder that runs the walk and the hashing phase.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Walk `root` and resolve its duplicates.
    ///
    /// The walk completes before any file is hashed.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root cannot be walked, a tracked file
    /// cannot be stat-ed, or a candidate cannot be hashed.
    pub fn find_duplicates(&self, root: &Path) -> Result<ScanResult, FinderError> {
        log::info!("Starting duplicate scan of {}", root.display());

        let mut walker = Walker::new(root, self.config.filter.clone());
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }
        let corpus = walker.build_corpus()?;

        let (hashes, stats) = resolve_duplicates(
            &corpus.sizes,
            &self.hasher,
            self.config.progress_callback.as_deref(),
        )?;

        Ok(ScanResult {
            corpus,
            hashes,
            stats,
        })
    }
}
