//! `recap clean`: remove generated wrappers.

use anyhow::{Context, Result};
use clap::Args;

use recap_sync::pipeline::block_on;

use super::ServiceArgs;

/// Arguments for `recap clean`.
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub service: ServiceArgs,
}

impl CleanArgs {
    pub fn run(self) -> Result<()> {
        let loaded = self.service.load()?;
        let removed = block_on(recap_sync::clean(&loaded.ctx, &loaded.service))?
            .context("recap clean failed")?;
        if removed {
            println!("✓ removed generated handlers");
        } else {
            println!("✓ nothing to clean");
        }
        Ok(())
    }
}
