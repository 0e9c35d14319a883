//! Domain types: the host service model, run configuration, and the
//! per-run function descriptors derived from it.
//!
//! The service model is the raw `serverless.yml` document with typed accessors
//! for the few paths this tool reads or rewrites, so a rewritten service
//! serializes back without losing anything.

use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::ServiceError;

/// Key under `custom` (service-wide) and under each function holding this tool's settings.
pub const SETTINGS_KEY: &str = "recap-dev";

/// Default name of the generated handlers directory.
pub const DEFAULT_HANDLERS_DIR: &str = "recap.dev_handlers";

/// Suffix appended to a function key to name its wrapper.
pub const WRAPPER_SUFFIX: &str = "recap-dev";

/// Instrumentation client library every wrapper imports.
pub const CLIENT_LIBRARY: &str = "@recap.dev/client";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed key of a function inside a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionKey(pub String);

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FunctionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FunctionKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Code-generation target a runtime is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// CommonJS module (`require` / `exports`).
    Node,
    /// ES module with static `import` syntax.
    TypeScript,
}

impl Language {
    /// Tag matched as a substring of a function's runtime string.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Node => "node",
            Language::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Host service model
// ---------------------------------------------------------------------------

/// A service configuration document, held as its raw YAML mapping.
///
/// Only a handful of paths are read or written; everything else (including
/// tagged values such as `!Ref`) passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Service(pub Mapping);

/// Borrowed view of one entry under `functions`.
#[derive(Debug, Clone)]
pub struct FunctionEntry<'a> {
    /// Function name. Numeric and boolean YAML keys are stringified.
    pub key: Cow<'a, str>,
    config: &'a Value,
}

impl<'a> FunctionEntry<'a> {
    /// Usually `<module path>.<exported method>`; kept raw because malformed
    /// handlers are tolerated during discovery.
    pub fn handler(&self) -> Option<&'a Value> {
        self.config.get("handler")
    }

    /// Handler as a string, if it is one.
    pub fn handler_str(&self) -> Option<&'a str> {
        self.handler().and_then(Value::as_str)
    }

    /// Function-level runtime. Falsy values fall back to the provider default.
    pub fn runtime(&self) -> Option<&'a Value> {
        self.config.get("runtime").filter(|v| is_truthy(v))
    }

    /// `recap-dev.disable` evaluated with loose truthiness.
    pub fn is_disabled(&self) -> bool {
        self.config
            .get(SETTINGS_KEY)
            .and_then(|s| s.get("disable"))
            .is_some_and(is_truthy)
    }
}

impl Service {
    /// Default runtime from `provider.runtime`.
    pub fn default_runtime(&self) -> Option<&Value> {
        self.0
            .get("provider")
            .and_then(|p| p.get("runtime"))
            .filter(|v| is_truthy(v))
    }

    /// Entries under `functions` in file order. Keys that are not scalars
    /// are skipped with a warning.
    pub fn functions(&self) -> Vec<FunctionEntry<'_>> {
        let Some(Value::Mapping(functions)) = self.0.get("functions") else {
            return vec![];
        };
        functions
            .iter()
            .filter_map(|(k, v)| match function_key(k) {
                Some(key) => Some(FunctionEntry { key, config: v }),
                None => {
                    tracing::warn!(key = ?k, "function key is not a scalar, ignoring");
                    None
                }
            })
            .collect()
    }

    /// Look up a single function by key.
    pub fn function(&self, key: &str) -> Option<FunctionEntry<'_>> {
        self.functions().into_iter().find(|f| f.key == key)
    }

    /// Read `custom.recap-dev` into a [`RunConfig`], applying defaults.
    pub fn run_config(&self) -> Result<RunConfig, ServiceError> {
        let raw = self
            .0
            .get("custom")
            .and_then(|c| c.get(SETTINGS_KEY))
            .filter(|v| !v.is_null());
        match raw {
            Some(value) => {
                serde_yaml::from_value(value.clone()).map_err(ServiceError::InvalidSettings)
            }
            None => Ok(RunConfig::default()),
        }
    }

    /// Overwrite `functions.<key>.handler`. Returns `false` if the function does not exist.
    pub fn set_handler(&mut self, key: &str, handler: String) -> bool {
        match self.function_mut(key) {
            Some(func) => {
                func.insert(Value::from("handler"), Value::String(handler));
                true
            }
            None => false,
        }
    }

    /// Append to `functions.<key>.package.include` when that list exists.
    pub fn append_function_include(&mut self, key: &str, entry: String) -> bool {
        self.function_mut(key)
            .is_some_and(|func| append_include(func, entry))
    }

    /// Append to the service-wide `package.include` when that list exists.
    pub fn append_service_include(&mut self, entry: String) -> bool {
        append_include(&mut self.0, entry)
    }

    /// The `include` list of `package` at the service level, if present.
    pub fn service_include(&self) -> Option<Vec<&str>> {
        include_of(self.0.get("package"))
    }

    /// The `include` list of `functions.<key>.package`, if present.
    pub fn function_include(&self, key: &str) -> Option<Vec<&str>> {
        let func = self.0.get("functions")?.get(key)?;
        include_of(func.get("package"))
    }

    fn function_mut(&mut self, key: &str) -> Option<&mut Mapping> {
        let Value::Mapping(functions) = self.0.get_mut("functions")? else {
            return None;
        };
        functions
            .iter_mut()
            .find(|(k, _)| function_key(k).is_some_and(|k| k == key))
            .and_then(|(_, v)| match v {
                Value::Mapping(m) => Some(m),
                _ => None,
            })
    }
}

/// Function name for a `functions` key, as the host reads it.
fn function_key(key: &Value) -> Option<Cow<'_, str>> {
    match key {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn include_of(package: Option<&Value>) -> Option<Vec<&str>> {
    match package?.get("include")? {
        Value::Sequence(items) => Some(items.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

fn append_include(owner: &mut Mapping, entry: String) -> bool {
    let include = owner
        .get_mut("package")
        .and_then(|p| p.get_mut("include"));
    match include {
        Some(Value::Sequence(items)) => {
            items.push(Value::String(entry));
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Options read from `custom.recap-dev` at the start of every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default = "default_handlers_dir")]
    pub handlers_dir_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_json_path: Option<PathBuf>,
}

fn default_handlers_dir() -> String {
    DEFAULT_HANDLERS_DIR.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            handlers_dir_name: default_handlers_dir(),
            disable: None,
            package_json_path: None,
        }
    }
}

impl RunConfig {
    /// `disable` is honoured only when its string form is `true` (any case).
    pub fn is_disabled(&self) -> bool {
        match &self.disable {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Handlers directory with every `\` turned into `/`, as used in handler paths.
    pub fn handlers_dir_posix(&self) -> String {
        self.handlers_dir_name.replace('\\', "/")
    }

    /// Handlers directory nested under `root`.
    ///
    /// A leading root or drive prefix is dropped, so an absolute name still
    /// lands inside `root`. Names that resolve to `root` itself or climb out of
    /// it through `..` are rejected: the directory is removed on every run.
    pub fn handlers_dir_under(&self, root: &Path) -> Result<PathBuf, ServiceError> {
        let posix = self.handlers_dir_posix();
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(&posix).components() {
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(self.outside(root));
                    }
                }
                Component::Normal(part) => parts.push(part),
            }
        }
        if parts.is_empty() {
            return Err(self.outside(root));
        }
        Ok(parts.into_iter().fold(root.to_path_buf(), |dir, part| dir.join(part)))
    }

    fn outside(&self, root: &Path) -> ServiceError {
        ServiceError::HandlersDirOutsideService {
            name: self.handlers_dir_name.clone(),
            root: root.to_path_buf(),
        }
    }
}

/// Loose truthiness for flag values: `false`, `null`, `0`, `""` are falsy,
/// everything else (including any mapping or sequence) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(t) => is_truthy(&t.value),
    }
}

// ---------------------------------------------------------------------------
// Function descriptor
// ---------------------------------------------------------------------------

/// A function eligible for wrapping, derived fresh on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescriptor {
    pub key: FunctionKey,
    /// Handler as configured, `None` when it was not a string.
    pub handler_reference: Option<String>,
    /// Module path: every dot-separated segment but the last.
    pub relative_path: String,
    /// Exported method: the last dot-separated segment.
    pub method: String,
    pub runtime: String,
    pub language: Language,
    /// `<key>-recap-dev`, the wrapper name before an extension is applied.
    pub wrapper_base_name: String,
}

impl FunctionDescriptor {
    /// Wrapper module path relative to the service root, e.g. `recap.dev_handlers/fnA-recap-dev`.
    pub fn wrapper_module_path(&self, handlers_dir_posix: &str) -> String {
        format!("{handlers_dir_posix}/{}", self.wrapper_base_name)
    }

    /// Handler to configure in place of the original one.
    pub fn wrapped_handler(&self, handlers_dir_posix: &str) -> String {
        format!("{}.{}", self.wrapper_module_path(handlers_dir_posix), self.method)
    }
}

/// `<key>-recap-dev`
pub fn wrapper_base_name(key: &FunctionKey) -> String {
    format!("{}-{WRAPPER_SUFFIX}", key.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
