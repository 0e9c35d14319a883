//! Sub-command implementations and the service-loading arguments they share.

pub mod clean;
pub mod hook;
pub mod list;
pub mod run;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use recap_core::{
    service::{load_service_at, load_service_file, save_service_at},
    Service,
};
use recap_detector::LibraryStatus;
use recap_sync::{PluginContext, RunOutcome, WriteResult};

/// Where to find the service and its manifest.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Service root directory (holds serverless.yml and receives the handlers directory).
    #[arg(long, short = 'd', value_name = "DIR")]
    pub service_dir: Option<PathBuf>,

    /// Explicit service configuration file (defaults to serverless.yml|yaml|json in the service dir).
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory whose package.json is checked for @recap.dev/client (defaults to the service dir).
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,
}

/// A loaded service plus the context runs operate in.
pub struct LoadedService {
    pub path: PathBuf,
    pub service: Service,
    pub ctx: PluginContext,
}

impl ServiceArgs {
    pub fn load(&self) -> Result<LoadedService> {
        let dir = self
            .service_dir
            .clone()
            .or_else(|| {
                self.config
                    .as_ref()
                    .and_then(|c| c.parent())
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
            })
            .unwrap_or_else(|| PathBuf::from("."));
        let dir = dir
            .canonicalize()
            .with_context(|| format!("cannot resolve service directory '{}'", dir.display()))?;

        let (path, service) = match &self.config {
            Some(file) => (file.clone(), load_service_file(file)?),
            None => load_service_at(&dir)?,
        };

        let mut ctx = PluginContext::new(dir);
        if let Some(prefix) = &self.prefix {
            ctx = ctx.with_prefix(prefix);
        }
        Ok(LoadedService { path, service, ctx })
    }
}

/// Options controlling where the rewritten service goes.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Render and report without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Write the rewritten service configuration to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// Save `service` to `--output`, or print it as YAML on stdout.
    pub fn emit(&self, service: &Service) -> Result<()> {
        match &self.output {
            Some(path) => save_service_at(path, service)
                .with_context(|| format!("failed to write '{}'", path.display()))?,
            None => {
                let yaml =
                    serde_yaml::to_string(service).context("failed to serialize service")?;
                print!("{yaml}");
            }
        }
        Ok(())
    }

    /// Whether stdout carries the rewritten service.
    fn prints_service(&self) -> bool {
        self.output.is_none()
    }
}

/// Human summary of a run. Goes to stderr when stdout carries the service YAML.
pub fn print_run_outcome(outcome: &RunOutcome, opts: &OutputArgs) {
    let mut out: Box<dyn Write> = if opts.prints_service() {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let prefix = if opts.dry_run { "[dry-run] " } else { "" };

    let report = match outcome {
        RunOutcome::Disabled => {
            let _ = writeln!(out, "{prefix}recap.dev disabled - not wrapping functions");
            return;
        }
        RunOutcome::Completed(report) => report,
    };

    let _ = writeln!(
        out,
        "{prefix}{} wrapped {} function(s) into {} ({} skipped)",
        "✓".green().bold(),
        report.wrapped.len(),
        report.handlers_dir.display(),
        report.skipped.len()
    );
    for w in &report.wrapped {
        let marker = match w.write {
            WriteResult::Written { .. } => "✎",
            WriteResult::WouldWrite { .. } => "~",
        };
        let _ = writeln!(out, "  {marker}  {} → {}", w.key, w.handler);
    }
    for s in &report.skipped {
        let _ = writeln!(out, "  {}  {} ({})", "·".bright_black(), s.key, s.reason);
    }
    for check in &report.libraries {
        if check.status == LibraryStatus::Unverified {
            let _ = writeln!(
                out,
                "  {} could not verify @recap.dev/client for {} functions",
                "!".yellow().bold(),
                check.language
            );
        }
    }
}
