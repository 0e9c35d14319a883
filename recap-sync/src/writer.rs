//! Run and cleanup sequences.
//!
//! ## `run`: phases
//!
//! 1. Read `custom.recap-dev`; stop if `disable` is set.
//! 2. Remove the handlers directory left by a previous run.
//! 3. Discover eligible functions.
//! 4. Validate instrumentation libraries, one task per language.
//! 5. Create the handlers directory; render + write one wrapper per function,
//!    one task per function.
//! 6. Point each function's handler at its wrapper and extend `package.include`.
//!
//! Any failure in 4 or 5 propagates before the service model is touched.
//! Wrappers already written by sibling tasks stay on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::task::JoinSet;

use recap_core::types::{FunctionDescriptor, FunctionKey, RunConfig, Service};
use recap_detector::{discover, manifest_path, validate_libraries, LibraryCheck, SkippedFunction};
use recap_renderer::Renderer;

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Context and results
// ---------------------------------------------------------------------------

/// Where a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginContext {
    /// Service root; the handlers directory is created inside it.
    pub service_path: PathBuf,
    /// Directory holding the default `package.json`.
    pub prefix: PathBuf,
}

impl PluginContext {
    /// Context whose prefix is the service root.
    pub fn new(service_path: impl Into<PathBuf>) -> Self {
        let service_path = service_path.into();
        Self {
            prefix: service_path.clone(),
            service_path,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Location of the handlers directory for `config`, always inside the
    /// service root.
    pub fn handlers_dir(&self, config: &RunConfig) -> Result<PathBuf, SyncError> {
        Ok(config.handlers_dir_under(&self.service_path)?)
    }
}

/// Outcome of an individual wrapper write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// Wrapper was written to disk.
    Written { path: PathBuf },
    /// Dry run: the wrapper *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// A function whose handler now points at a generated wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrappedFunction {
    pub key: FunctionKey,
    /// Handler before the rewrite, if it was a string.
    pub original_handler: Option<String>,
    /// Handler after the rewrite.
    pub handler: String,
    /// SHA-256 of the wrapper source.
    pub digest: String,
    pub write: WriteResult,
}

/// Everything a completed run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub handlers_dir: PathBuf,
    pub wrapped: Vec<WrappedFunction>,
    pub skipped: Vec<SkippedFunction>,
    pub libraries: Vec<LibraryCheck>,
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// `custom.recap-dev.disable` is set; nothing was done.
    Disabled,
    Completed(RunReport),
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Generate wrappers for every eligible function and rewrite `service` so
/// their handlers point at them.
///
/// With `dry_run`, nothing on disk is touched but the service model is still
/// rewritten and the report lists [`WriteResult::WouldWrite`] entries.
pub async fn run(
    ctx: &PluginContext,
    service: &mut Service,
    dry_run: bool,
) -> Result<RunOutcome, SyncError> {
    let config = service.run_config()?;
    if config.is_disabled() {
        tracing::info!("recap.dev disabled - not wrapping functions");
        return Ok(RunOutcome::Disabled);
    }
    tracing::info!("Wrapping your functions with recap.dev...");

    let handlers_dir = ctx.handlers_dir(&config)?;
    if !dry_run {
        remove_handlers_dir(&handlers_dir).await?;
    }

    let discovery = discover(service);
    let manifest = manifest_path(&config, &ctx.service_path, &ctx.prefix);
    let libraries = validate_libraries(&discovery.functions, &manifest).await?;

    let writes = generate_wrappers(&handlers_dir, &discovery.functions, dry_run).await?;
    let wrapped = assign_handlers(service, &config, &discovery.functions, writes);

    Ok(RunOutcome::Completed(RunReport {
        handlers_dir,
        wrapped,
        skipped: discovery.skipped,
        libraries,
    }))
}

/// Remove the handlers directory. Returns whether anything was removed.
pub async fn clean(ctx: &PluginContext, service: &Service) -> Result<bool, SyncError> {
    let config = service.run_config()?;
    tracing::info!("Cleaning up recap.dev handlers");
    remove_handlers_dir(&ctx.handlers_dir(&config)?).await
}

async fn remove_handlers_dir(dir: &Path) -> Result<bool, SyncError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            tracing::debug!(path = %dir.display(), "removed handlers directory");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(dir, e)),
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Rendered wrapper, ready to be written.
struct Rendered {
    path: PathBuf,
    content: String,
    digest: String,
}

async fn generate_wrappers(
    handlers_dir: &Path,
    functions: &[FunctionDescriptor],
    dry_run: bool,
) -> Result<Vec<(WriteResult, String)>, SyncError> {
    if !dry_run {
        match tokio::fs::create_dir_all(handlers_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(io_err(handlers_dir, e)),
        }
    }

    let renderer = Renderer::new();
    let mut tasks = JoinSet::new();
    for (index, func) in functions.iter().enumerate() {
        let func = func.clone();
        let handlers_dir = handlers_dir.to_path_buf();
        tasks.spawn(async move {
            let rendered = render_wrapper(&renderer, &handlers_dir, &func)?;
            let write = write_wrapper(&rendered.path, &rendered.content, dry_run).await?;
            Ok::<_, SyncError>((index, write, rendered.digest))
        });
    }

    let mut results: Vec<Option<(WriteResult, String)>> = vec![None; functions.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, write, digest) = joined.map_err(|e| SyncError::Join(e.to_string()))??;
        results[index] = Some((write, digest));
    }
    Ok(results.into_iter().flatten().collect())
}

fn render_wrapper(
    renderer: &Renderer,
    handlers_dir: &Path,
    func: &FunctionDescriptor,
) -> Result<Rendered, SyncError> {
    let (file_name, source) = renderer.render_file(func)?;
    // Normalise line endings so output is byte-stable across platforms.
    let content = source.replace("\r\n", "\n");
    let digest = hex::encode(Sha256::digest(content.as_bytes()));
    Ok(Rendered {
        path: handlers_dir.join(file_name),
        content,
        digest,
    })
}

/// Write `content` to `<path>.recap.tmp`, then rename over `path`.
pub(crate) async fn write_wrapper(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.recap.tmp", path.display()));
    tokio::fs::write(&tmp, content)
        .await
        .map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Config rewrite
// ---------------------------------------------------------------------------

fn assign_handlers(
    service: &mut Service,
    config: &RunConfig,
    functions: &[FunctionDescriptor],
    writes: Vec<(WriteResult, String)>,
) -> Vec<WrappedFunction> {
    let dir = config.handlers_dir_posix();
    let mut wrapped = Vec::with_capacity(functions.len());

    for (func, (write, digest)) in functions.iter().zip(writes) {
        let module_path = func.wrapper_module_path(&dir);
        let handler = func.wrapped_handler(&dir);
        service.set_handler(&func.key.0, handler.clone());
        // Keep the wrapper in the function artifact even if it was excluded.
        service.append_function_include(&func.key.0, module_path);

        wrapped.push(WrappedFunction {
            key: func.key.clone(),
            original_handler: func.handler_reference.clone(),
            handler,
            digest,
            write,
        });
    }

    service.append_service_include(format!("{dir}/**"));
    wrapped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
