//! Host lifecycle hooks and the shared dispatch entrypoint used by the CLI.

use std::fmt;

use recap_core::types::Service;

use crate::writer::{clean, run, PluginContext, RunOutcome};
use crate::SyncError;

/// What a hook does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Regenerate wrappers and rewrite handlers.
    Run,
    /// Remove generated wrappers only.
    Clean,
}

impl fmt::Display for HookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookAction::Run => write!(f, "run"),
            HookAction::Clean => write!(f, "clean"),
        }
    }
}

/// Host lifecycle events this tool attaches to, in registration order.
pub const HOOKS: &[(&str, HookAction)] = &[
    ("after:package:initialize", HookAction::Run),
    ("before:deploy:function:packageFunction", HookAction::Run),
    ("before:invoke:local:invoke", HookAction::Run),
    ("before:offline:start:init", HookAction::Run),
    ("before:step-functions-offline:start", HookAction::Run),
    ("after:package:createDeploymentArtifacts", HookAction::Clean),
    ("after:invoke:local:invoke", HookAction::Clean),
    ("recap:clean:init", HookAction::Clean),
    ("recap:run:init", HookAction::Run),
];

/// Action bound to a lifecycle `event`, if any.
pub fn action_for(event: &str) -> Option<HookAction> {
    HOOKS
        .iter()
        .find(|(name, _)| *name == event)
        .map(|(_, action)| *action)
}

/// Result of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Ran(RunOutcome),
    /// `true` when a handlers directory was removed.
    Cleaned(bool),
}

/// Execute `action` against `service`.
pub async fn dispatch(
    action: HookAction,
    ctx: &PluginContext,
    service: &mut Service,
    dry_run: bool,
) -> Result<HookOutcome, SyncError> {
    match action {
        HookAction::Run => Ok(HookOutcome::Ran(run(ctx, service, dry_run).await?)),
        HookAction::Clean => Ok(HookOutcome::Cleaned(clean(ctx, service).await?)),
    }
}

/// Run `fut` to completion on a single-threaded runtime.
pub fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, SyncError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| crate::error::io_err("tokio-runtime", e))?;
    Ok(runtime.block_on(fut))
}
