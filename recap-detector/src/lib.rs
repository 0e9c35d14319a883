//! Function discovery and instrumentation-library validation for `recap-detector`.
//!
//! [`discover`] classifies a service's functions into wrappable descriptors and
//! skipped entries; [`validate_libraries`] checks that each language present
//! declares the instrumentation client in its dependency manifest.

use std::path::PathBuf;

use recap_core::types::Language;
use thiserror::Error;

pub mod discover;
pub mod manifest;

pub use discover::{discover, discover_functions, Discovery, SkipReason, SkippedFunction};
pub use manifest::{manifest_path, validate_libraries, LibraryCheck, LibraryStatus};

/// Errors from library validation.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("{library} Node library must be installed in order to use this plugin! ({language} functions, manifest {manifest})")]
    MissingDependency {
        library: &'static str,
        language: Language,
        manifest: PathBuf,
    },

    #[error("validation task failed: {0}")]
    Join(String),
}
