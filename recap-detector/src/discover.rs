//! Function discovery.
//!
//! Walks the service's functions in file order and turns every eligible one
//! into a [`FunctionDescriptor`]. Checks run in this order:
//!
//! 1. `recap-dev.disable` truthy → skipped (logged).
//! 2. runtime (own, else `provider.runtime`) missing or not a string → skipped.
//! 3. runtime matches no registered language tag → skipped (logged).

use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use recap_core::types::{
    wrapper_base_name, FunctionDescriptor, FunctionEntry, FunctionKey, Service,
};
use recap_renderer::language_for_runtime;

/// Why a function was left unwrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// `recap-dev.disable` is set on the function.
    Disabled,
    /// Neither the function nor the provider declares a string runtime.
    UnresolvableRuntime,
    /// The runtime matches no registered language.
    UnsupportedRuntime { runtime: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => f.write_str("disabled"),
            SkipReason::UnresolvableRuntime => f.write_str("no runtime"),
            SkipReason::UnsupportedRuntime { runtime } => {
                write!(f, "runtime \"{runtime}\" not supported")
            }
        }
    }
}

/// A function excluded from wrapping, with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFunction {
    pub key: FunctionKey,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of a discovery pass. Both lists follow the service's function order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub functions: Vec<FunctionDescriptor>,
    pub skipped: Vec<SkippedFunction>,
}

/// Discover eligible functions in `service`.
pub fn discover(service: &Service) -> Discovery {
    discover_functions(&service.functions(), service.default_runtime())
}

/// Discover eligible functions among `functions`, falling back to
/// `default_runtime` for functions without their own runtime.
pub fn discover_functions(
    functions: &[FunctionEntry<'_>],
    default_runtime: Option<&Value>,
) -> Discovery {
    let mut discovery = Discovery::default();
    for func in functions {
        match classify(func, default_runtime) {
            Ok(descriptor) => discovery.functions.push(descriptor),
            Err(reason) => discovery.skipped.push(SkippedFunction {
                key: FunctionKey::from(func.key.as_ref()),
                reason,
            }),
        }
    }
    discovery
}

fn classify(
    func: &FunctionEntry<'_>,
    default_runtime: Option<&Value>,
) -> Result<FunctionDescriptor, SkipReason> {
    let key: &str = &func.key;

    if func.is_disabled() {
        tracing::info!(function = key, "recap.dev is disabled for function {key}, skipping.");
        return Err(SkipReason::Disabled);
    }

    let Some(runtime) = func.runtime().or(default_runtime).and_then(Value::as_str) else {
        tracing::debug!(function = key, "no string runtime, skipping");
        return Err(SkipReason::UnresolvableRuntime);
    };

    let Some(language) = language_for_runtime(runtime) else {
        tracing::warn!(
            function = key,
            runtime,
            "Runtime \"{runtime}\" is not supported yet, skipping function {key}"
        );
        return Err(SkipReason::UnsupportedRuntime {
            runtime: runtime.to_string(),
        });
    };

    let handler_reference = func.handler_str().map(str::to_string);
    let (relative_path, method) = handler_reference
        .as_deref()
        .map(split_handler)
        .unwrap_or_default();

    let key = FunctionKey::from(key);
    Ok(FunctionDescriptor {
        wrapper_base_name: wrapper_base_name(&key),
        key,
        handler_reference,
        relative_path,
        method,
        runtime: runtime.to_string(),
        language,
    })
}

/// Split `<module path>.<method>` on the last dot. A handler without a dot is
/// all method and no module path.
pub fn split_handler(handler: &str) -> (String, String) {
    match handler.rsplit_once('.') {
        Some((path, method)) => (path.to_string(), method.to_string()),
        None => (String::new(), handler.to_string()),
    }
}
