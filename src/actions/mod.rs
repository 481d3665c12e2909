//! File actions module.
//!
//! This module provides functionality for:
//! - Raw byte copy between paths
//! - Materializing duplicate sets and originals into a flat destination
//!
//! ```no_run
//! use dupfold::actions::copy_file;
//! use std::path::Path;
//!
//! let bytes = copy_file(Path::new("a.bin"), Path::new("dest_files/a.bin")).unwrap();
//! println!("copied {} bytes", bytes);
//! ```

pub mod copy;
pub mod materialize;

// Re-export commonly used types
pub use copy::{copy_file, CopyError};
pub use materialize::{MaterializeReport, Materializer};
