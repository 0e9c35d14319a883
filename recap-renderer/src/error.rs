//! Error types for recap-renderer.

use recap_core::types::Language;
use thiserror::Error;

/// All errors that can arise from wrapper rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A descriptor reached the renderer with a language the registry does not
    /// know. Discovery only emits registered languages, so this is a bug.
    #[error("no wrapper template registered for language '{language}' (function '{function}')")]
    TemplateMissing { language: Language, function: String },
}
