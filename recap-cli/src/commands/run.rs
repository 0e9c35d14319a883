//! `recap run`: regenerate wrappers and rewrite handlers.

use anyhow::{Context, Result};
use clap::Args;

use recap_sync::pipeline::block_on;

use super::{print_run_outcome, OutputArgs, ServiceArgs};

/// Arguments for `recap run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let mut loaded = self.service.load()?;
        let outcome = block_on(recap_sync::run(
            &loaded.ctx,
            &mut loaded.service,
            self.output.dry_run,
        ))?
        .with_context(|| format!("recap run failed for '{}'", loaded.path.display()))?;

        print_run_outcome(&outcome, &self.output);
        self.output.emit(&loaded.service)
    }
}
