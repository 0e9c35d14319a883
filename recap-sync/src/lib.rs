//! # recap-sync
//!
//! Wrapper generation and handler rewrite orchestration.
//!
//! Call [`run`] to regenerate every wrapper and point the service's handlers
//! at them, or [`clean`] to remove the generated directory. [`pipeline`] maps
//! host lifecycle events onto those two actions.

pub mod error;
pub mod pipeline;
pub mod writer;

pub use error::SyncError;
pub use pipeline::{action_for, dispatch, HookAction, HookOutcome, HOOKS};
pub use writer::{
    clean, run, PluginContext, RunOutcome, RunReport, WrappedFunction, WriteResult,
};
