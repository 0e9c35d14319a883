//! Error types for recap-sync.

use std::path::PathBuf;

use thiserror::Error;

use recap_core::ServiceError;
use recap_detector::DetectError;
use recap_renderer::RenderError;

/// All errors that can abort a run or a cleanup.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the wrapper renderer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A required instrumentation library is not declared.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// The service configuration could not be read.
    #[error("service configuration error: {0}")]
    Service(#[from] ServiceError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A concurrent write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Join(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
