//! Materialization of dedup results into a flat destination directory.
//!
//! # Overview
//!
//! Every file lands at `destination/<file name>`:
//! - **Phase A** copies each member of each confirmed duplicate set.
//! - **Phase B** copies each tracked file whose destination is still free.
//!
//! Files sharing a base name overwrite one another in Phase A; in Phase B
//! the first writer wins. Phase B is idempotent: once the destination holds
//! every base name, running it again copies nothing.
//!
//! The destination directory is never created here. A missing destination
//! makes the first copy fail, which aborts the run.
//!
//! A source that already is its own destination (the destination lives
//! inside the walked tree, or holds a hardlink to the source) is left
//! alone rather than truncated.
//!
//! # Example
//!
//! ```no_run
//! use dupfold::actions::Materializer;
//! use dupfold::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let scan = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("/backups"))
//!     .unwrap();
//!
//! let materializer = Materializer::new(Path::new("dest_files"));
//! let mut report = materializer.copy_duplicates(&scan.hashes).unwrap();
//! report.merge(materializer.copy_originals(&scan.corpus.seen).unwrap());
//! println!("{}", report.summary());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::copy::{copy_file, CopyError};
use crate::duplicates::HashCorpus;
use crate::progress::ProgressCallback;
use crate::scanner::SeenSet;

/// Counters for a materialization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Duplicate-set members copied in Phase A
    pub duplicates_copied: usize,
    /// Files copied in Phase B
    pub originals_copied: usize,
    /// Files skipped in Phase B because their destination already existed
    pub originals_skipped: usize,
    /// Bytes written across both phases
    pub bytes_written: u64,
}

impl MaterializeReport {
    /// Total number of copies performed.
    #[must_use]
    pub fn total_copied(&self) -> usize {
        self.duplicates_copied + self.originals_copied
    }

    /// Fold another report's counters into this one.
    pub fn merge(&mut self, other: MaterializeReport) {
        self.duplicates_copied += other.duplicates_copied;
        self.originals_copied += other.originals_copied;
        self.originals_skipped += other.originals_skipped;
        self.bytes_written += other.bytes_written;
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Copied {} duplicate(s) and {} original(s), skipped {}, wrote {}",
            self.duplicates_copied,
            self.originals_copied,
            self.originals_skipped,
            bytesize::ByteSize::b(self.bytes_written)
        )
    }
}

/// Copies dedup results into a destination directory.
pub struct Materializer {
    destination: PathBuf,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("destination", &self.destination)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Materializer {
    /// Create a materializer targeting an existing destination directory.
    #[must_use]
    pub fn new(destination: &Path) -> Self {
        Self {
            destination: destination.to_path_buf(),
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Destination directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Destination path for a source file: `destination/<file name>`.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::NoFileName`] if the source has no file name.
    pub fn destination_for(&self, source: &Path) -> Result<PathBuf, CopyError> {
        source
            .file_name()
            .map(|name| self.destination.join(name))
            .ok_or_else(|| CopyError::NoFileName(source.to_path_buf()))
    }

    /// Phase A: copy every member of every duplicate set.
    ///
    /// # Errors
    ///
    /// Stops at the first failed copy and returns it.
    pub fn copy_duplicates(&self, hashes: &HashCorpus) -> Result<MaterializeReport, CopyError> {
        let mut report = MaterializeReport::default();
        self.phase_start("copying duplicates", hashes.total_files());

        for set in hashes.iter() {
            log::info!("Duplicate set {} ({} files)", set.hash_hex(), set.len());
            for source in &set.paths {
                let target = self.destination_for(source)?;
                if is_same_file(source, &target) {
                    log::debug!("Already in place: {}", target.display());
                    continue;
                }
                log::debug!("Recreating clone {} -> {}", source.display(), target.display());
                report.bytes_written += copy_file(source, &target)?;
                report.duplicates_copied += 1;
                self.progress(report.duplicates_copied, source);
            }
        }

        self.phase_end("copying duplicates");
        Ok(report)
    }

    /// Phase B: copy every seen file whose destination does not exist yet.
    ///
    /// # Errors
    ///
    /// Stops at the first failed copy or failed existence check.
    pub fn copy_originals(&self, seen: &SeenSet) -> Result<MaterializeReport, CopyError> {
        let mut report = MaterializeReport::default();
        self.phase_start("copying originals", seen.len());

        for (idx, source) in seen.iter().enumerate() {
            let target = self.destination_for(source)?;
            let exists = target.try_exists().map_err(|e| CopyError::Io {
                source_path: source.clone(),
                destination: target.clone(),
                source: e,
            })?;

            if exists {
                log::trace!("Already present: {}", target.display());
                report.originals_skipped += 1;
            } else {
                log::debug!("Copying non-duplicate {} -> {}", source.display(), target.display());
                report.bytes_written += copy_file(source, &target)?;
                report.originals_copied += 1;
            }
            self.progress(idx + 1, source);
        }

        self.phase_end("copying originals");
        Ok(report)
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(phase, total);
        }
    }

    fn progress(&self, current: usize, path: &Path) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(current, &path.to_string_lossy());
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(phase);
        }
    }
}

/// Whether both paths name the same existing file, including through a
/// hardlink or symlink. A missing target is never the same file.
#[cfg(unix)]
fn is_same_file(source: &Path, target: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (std::fs::metadata(source), std::fs::metadata(target)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (source.canonicalize(), target.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
