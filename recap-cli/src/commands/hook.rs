//! `recap hook <event>`: run whatever is bound to a host lifecycle event.

use anyhow::{bail, Context, Result};
use clap::Args;

use recap_sync::{action_for, dispatch, pipeline::block_on, HookOutcome, HOOKS};

use super::{print_run_outcome, OutputArgs, ServiceArgs};

/// Arguments for `recap hook`.
#[derive(Args, Debug)]
pub struct HookArgs {
    /// Lifecycle event name, e.g. `after:package:initialize`.
    pub event: String,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl HookArgs {
    pub fn run(self) -> Result<()> {
        let Some(action) = action_for(&self.event) else {
            let known: Vec<_> = HOOKS.iter().map(|(name, _)| *name).collect();
            bail!(
                "unknown lifecycle event '{}'; expected one of: {}",
                self.event,
                known.join(", ")
            );
        };

        let mut loaded = self.service.load()?;
        tracing::debug!(event = %self.event, %action, "dispatching hook");
        let outcome = block_on(dispatch(
            action,
            &loaded.ctx,
            &mut loaded.service,
            self.output.dry_run,
        ))?
        .with_context(|| format!("hook '{}' ({action}) failed", self.event))?;

        match outcome {
            HookOutcome::Ran(run) => {
                print_run_outcome(&run, &self.output);
                self.output.emit(&loaded.service)
            }
            HookOutcome::Cleaned(removed) => {
                if removed {
                    println!("✓ removed generated handlers");
                } else {
                    println!("✓ nothing to clean");
                }
                Ok(())
            }
        }
    }
}
