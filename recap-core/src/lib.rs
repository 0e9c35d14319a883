//! recap core library: service model, run configuration, descriptors, errors.
//!
//! - [`types`]: service model, [`RunConfig`], [`FunctionDescriptor`]
//! - [`service`]: locate / load / save the service document
//! - [`error`]: [`ServiceError`]

pub mod error;
pub mod service;
pub mod types;

pub use error::ServiceError;
pub use types::{
    is_truthy, wrapper_base_name, FunctionDescriptor, FunctionEntry, FunctionKey, Language,
    RunConfig, Service, CLIENT_LIBRARY, DEFAULT_HANDLERS_DIR, SETTINGS_KEY, WRAPPER_SUFFIX,
};
