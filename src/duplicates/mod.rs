//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Full hash comparison within same-size groups
//! - Confirmed duplicate set management

pub mod finder;
pub mod groups;

pub use finder::{
    resolve_duplicates, DuplicateFinder, FinderConfig, FinderError, ResolveStats, ScanResult,
};
pub use groups::{DuplicateSet, HashCorpus};
