//! Size-keyed file corpus produced by the directory walk.
//!
//! # Overview
//!
//! The walk produces two structures:
//! - [`SizeCorpus`]: every tracked path, bucketed by its exact byte size
//! - [`SeenSet`]: every tracked path, regardless of duplicate status
//!
//! Files with different sizes cannot be duplicates, so only buckets
//! holding two or more paths are ever handed to the hashing phase.
//!
//! # Example
//!
//! ```
//! use dupfold::scanner::SizeCorpus;
//! use std::path::PathBuf;
//!
//! let mut sizes = SizeCorpus::new();
//! sizes.insert(1024, PathBuf::from("/a.bin"));
//! sizes.insert(1024, PathBuf::from("/b.bin"));
//! sizes.insert(2048, PathBuf::from("/c.bin"));
//!
//! assert_eq!(sizes.total_files(), 3);
//! assert_eq!(sizes.candidate_buckets().count(), 1);
//! ```

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Every path that passed the extension filter during the walk.
pub type SeenSet = BTreeSet<PathBuf>;

/// Tracked paths grouped by exact file size.
///
/// Buckets are ordered by size and paths within a bucket keep the order
/// in which the walk visited them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeCorpus {
    buckets: BTreeMap<u64, Vec<PathBuf>>,
}

impl SizeCorpus {
    /// Create an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the bucket for `size`.
    pub fn insert(&mut self, size: u64, path: PathBuf) {
        self.buckets.entry(size).or_default().push(path);
    }

    /// Paths recorded with the given size.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[PathBuf]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Iterate all buckets in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[PathBuf])> {
        self.buckets
            .iter()
            .map(|(size, paths)| (*size, paths.as_slice()))
    }

    /// Iterate only the buckets that could hold duplicates (2+ paths).
    pub fn candidate_buckets(&self) -> impl Iterator<Item = (u64, &[PathBuf])> {
        self.iter().filter(|(_, paths)| paths.len() > 1)
    }

    /// Size recorded for a path, if it was tracked.
    #[must_use]
    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(size, _)| *size)
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check whether no file was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of paths across all buckets.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Total bytes across all tracked files.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.buckets
            .iter()
            .map(|(size, paths)| size * paths.len() as u64)
            .sum()
    }

    /// Number of paths that sit alone in their size bucket.
    #[must_use]
    pub fn unique_size_files(&self) -> usize {
        self.buckets.values().filter(|paths| paths.len() == 1).count()
    }
}

/// Statistics gathered while walking the source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files visited (before extension filtering)
    pub files_visited: usize,
    /// Files skipped because their extension is not allow-listed
    pub filtered_out: usize,
    /// Entries skipped because they are neither regular files nor directories
    pub skipped_special: usize,
    /// Traversal errors that were logged and skipped
    pub traversal_errors: usize,
}

/// Output of the corpus builder: size buckets plus the seen set.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Tracked paths grouped by size
    pub sizes: SizeCorpus,
    /// Every tracked path
    pub seen: SeenSet,
    /// Walk statistics
    pub stats: WalkStats,
}

impl Corpus {
    /// Record a tracked file of the given size.
    pub fn record(&mut self, path: PathBuf, size: u64) {
        self.seen.insert(path.clone());
        self.sizes.insert(size, path);
    }
}
