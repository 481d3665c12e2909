//! Hash-keyed grouping of confirmed duplicates.
//!
//! # Overview
//!
//! [`HashCorpus`] maps a BLAKE3 content hash to the paths sharing it. Only
//! paths drawn from size buckets of two or more files are ever inserted,
//! and once resolution finishes the corpus is pruned to buckets of two or
//! more paths, so every bucket is a confirmed set of byte-identical files.
//!
//! # Example
//!
//! ```
//! use dupfold::duplicates::HashCorpus;
//! use std::path::PathBuf;
//!
//! let mut hashes = HashCorpus::new();
//! hashes.insert([1; 32], 4, PathBuf::from("/a.bin"));
//! hashes.insert([1; 32], 4, PathBuf::from("/b.bin"));
//! hashes.insert([2; 32], 4, PathBuf::from("/c.bin"));
//!
//! hashes.retain_duplicates();
//! assert_eq!(hashes.len(), 1);
//! assert_eq!(hashes.duplicate_files(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::scanner::{hash_to_hex, Hash};

/// Files sharing one content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    /// BLAKE3 hash of the shared content
    pub hash: Hash,
    /// Size in bytes shared by every member
    pub size: u64,
    /// Member paths in the order they were hashed
    pub paths: Vec<PathBuf>,
}

impl DuplicateSet {
    /// Number of files in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of copies beyond the first.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes taken by copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Tracked paths grouped by content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashCorpus {
    sets: BTreeMap<Hash, DuplicateSet>,
}

impl HashCorpus {
    /// Create an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the bucket for `hash`.
    ///
    /// Equal hashes imply equal sizes, so the size of the first insert is
    /// kept for the bucket.
    pub fn insert(&mut self, hash: Hash, size: u64, path: PathBuf) {
        self.sets
            .entry(hash)
            .or_insert_with(|| DuplicateSet {
                hash,
                size,
                paths: Vec::new(),
            })
            .paths
            .push(path);
    }

    /// Drop every bucket with fewer than two paths.
    ///
    /// Returns the number of buckets removed.
    pub fn retain_duplicates(&mut self) -> usize {
        let before = self.sets.len();
        self.sets.retain(|hash, set| {
            if set.len() > 1 {
                true
            } else {
                log::trace!("Unique content {}: {:?}", hash_to_hex(hash), set.paths);
                false
            }
        });
        before - self.sets.len()
    }

    /// Bucket for a hash.
    #[must_use]
    pub fn get(&self, hash: &Hash) -> Option<&DuplicateSet> {
        self.sets.get(hash)
    }

    /// Iterate buckets in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &DuplicateSet> {
        self.sets.values()
    }

    /// Iterate every path in every bucket.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sets
            .values()
            .flat_map(|set| set.paths.iter().map(PathBuf::as_path))
    }

    /// Check whether a path belongs to any bucket.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.paths().any(|p| p == path)
    }

    /// Bucket containing a path, if any.
    #[must_use]
    pub fn set_of(&self, path: &Path) -> Option<&DuplicateSet> {
        self.sets
            .values()
            .find(|set| set.paths.iter().any(|p| p == path))
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check whether there are no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total paths across all buckets.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.sets.values().map(DuplicateSet::len).sum()
    }

    /// Paths beyond the first in each bucket.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.sets.values().map(DuplicateSet::duplicate_count).sum()
    }

    /// Bytes that copies beyond the first occupy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.sets.values().map(DuplicateSet::wasted_space).sum()
    }
}
