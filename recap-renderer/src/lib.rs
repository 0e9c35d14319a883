//! # recap-renderer
//!
//! Template registry and wrapper renderer. Turns a [`FunctionDescriptor`]
//! into the source text of its instrumentation wrapper and the wrapper's file
//! name.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use recap_core::types::FunctionDescriptor;
//! use recap_renderer::Renderer;
//!
//! fn render_all(functions: &[FunctionDescriptor]) {
//!     let renderer = Renderer::new();
//!     for func in functions {
//!         if let Ok((name, source)) = renderer.render_file(func) {
//!             println!("{name}: {} bytes", source.len());
//!         }
//!     }
//! }
//! ```
//!
//! [`FunctionDescriptor`]: recap_core::types::FunctionDescriptor

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::Renderer;
pub use error::RenderError;
pub use registry::{language_for_runtime, template_for, TemplateEntry};
