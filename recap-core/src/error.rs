//! Error types for recap-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading, reading, or saving a service model.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse service configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No service configuration file exists in the service directory.
    #[error("service configuration not found in {dir} (looked for {candidates})")]
    NotFound { dir: PathBuf, candidates: String },

    /// `custom.recap-dev` exists but has the wrong shape.
    #[error("invalid custom.recap-dev settings: {0}")]
    InvalidSettings(#[source] serde_yaml::Error),

    /// `handlersDirName` resolves to the service root or outside it.
    #[error("handlersDirName '{name}' must name a directory inside {root}")]
    HandlersDirOutsideService { name: String, root: PathBuf },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ServiceError {
    ServiceError::Io {
        path: path.into(),
        source,
    }
}
