//! End-to-end dedup pipeline.
//!
//! Runs the phases strictly in order: walk, hash same-size candidates,
//! copy duplicate sets, copy remaining originals. The first fatal error
//! stops the run; nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use dupfold::pipeline::Pipeline;
//! use dupfold::scanner::ExtensionFilter;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(ExtensionFilter::new(["bin"]), Path::new("dest_files"));
//! let summary = pipeline.run(Path::new("/backups")).unwrap();
//! println!("{}", summary.display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use crate::actions::{MaterializeReport, Materializer};
use crate::duplicates::{DuplicateFinder, FinderConfig, ResolveStats};
use crate::error::PipelineError;
use crate::progress::ProgressCallback;
use crate::scanner::{ExtensionFilter, WalkStats};

/// Summary of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files that passed the extension filter
    pub tracked_files: usize,
    /// Total bytes across tracked files
    pub tracked_bytes: u64,
    /// Distinct sizes among tracked files
    pub size_buckets: usize,
    /// Walk statistics
    pub walk: WalkStats,
    /// Hashing statistics
    pub resolve: ResolveStats,
    /// Copy counters from both materialization phases
    pub materialize: MaterializeReport,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Multi-line human-readable report.
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "Tracked {} file(s) ({}) in {} size bucket(s)\n\
             Hashed {} file(s): {} duplicate set(s), {} redundant cop(ies), {} redundant\n\
             {}\n\
             Finished in {:.2?}",
            self.tracked_files,
            ByteSize::b(self.tracked_bytes),
            self.size_buckets,
            self.resolve.hashed_files,
            self.resolve.duplicate_sets,
            self.resolve.duplicate_files,
            ByteSize::b(self.resolve.wasted_space),
            self.materialize.summary(),
            self.duration
        )
    }
}

/// Orchestrates walk, resolve, and both materialization phases.
pub struct Pipeline {
    filter: ExtensionFilter,
    destination: PathBuf,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("filter", &self.filter)
            .field("destination", &self.destination)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline for an allow-list and an existing destination.
    #[must_use]
    pub fn new(filter: ExtensionFilter, destination: &Path) -> Self {
        Self {
            filter,
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

    /// Run every phase against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] for the first walk, hash, or copy failure.
    pub fn run(&self, root: &Path) -> Result<RunSummary, PipelineError> {
        let start = Instant::now();

        let mut finder_config = FinderConfig::default().with_filter(self.filter.clone());
        let mut materializer = Materializer::new(&self.destination);
        if let Some(ref callback) = self.progress_callback {
            finder_config = finder_config.with_progress_callback(Arc::clone(callback));
            materializer = materializer.with_progress_callback(Arc::clone(callback));
        }

        let scan = DuplicateFinder::new(finder_config).find_duplicates(root)?;

        log::info!("Identifying and compacting duplicates into {}", self.destination.display());
        let mut report = materializer.copy_duplicates(&scan.hashes)?;

        log::info!("Moving over non-duplicates");
        report.merge(materializer.copy_originals(&scan.corpus.seen)?);

        let summary = RunSummary {
            tracked_files: scan.corpus.seen.len(),
            tracked_bytes: scan.corpus.sizes.total_size(),
            size_buckets: scan.corpus.sizes.len(),
            walk: scan.corpus.stats,
            resolve: scan.stats,
            materialize: report,
            duration: start.elapsed(),
        };

        log::info!(
            "Run complete: {} tracked, {} copied, {} skipped",
            summary.tracked_files,
            summary.materialize.total_copied(),
            summary.materialize.originals_skipped
        );

        Ok(summary)
    }
}
