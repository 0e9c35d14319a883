//! Instrumentation library validation.
//!
//! Node functions need `@recap.dev/client` declared under `dependencies` in
//! the service's `package.json`. Languages without a check always pass. A
//! manifest that cannot be read or parsed is not an error: the check is
//! skipped with a warning because some setups keep their manifest elsewhere.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::task::JoinSet;

use recap_core::types::{FunctionDescriptor, Language, RunConfig, CLIENT_LIBRARY};

use crate::DetectError;

/// Manifest file name looked up under the prefix directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Outcome of validating one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStatus {
    /// The client library is declared.
    Declared,
    /// The manifest could not be read or parsed; validation was skipped.
    Unverified,
    /// This language has no library check.
    NotRequired,
}

/// Per-language validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryCheck {
    pub language: Language,
    pub status: LibraryStatus,
}

/// Where the manifest is read from: `packageJsonPath` if configured (relative
/// paths resolve against `service_path`), else `<prefix>/package.json`.
pub fn manifest_path(config: &RunConfig, service_path: &Path, prefix: &Path) -> PathBuf {
    match &config.package_json_path {
        Some(p) => service_path.join(p),
        None => prefix.join(MANIFEST_FILE),
    }
}

/// Whether functions of `language` require the client library in a manifest.
pub fn requires_client_library(language: Language) -> bool {
    matches!(language, Language::Node)
}

/// Validate every distinct language among `functions` concurrently.
///
/// Results are ordered by language. The first failing check aborts the run.
pub async fn validate_libraries(
    functions: &[FunctionDescriptor],
    manifest: &Path,
) -> Result<Vec<LibraryCheck>, DetectError> {
    let languages: BTreeSet<Language> = functions.iter().map(|f| f.language).collect();

    let mut tasks = JoinSet::new();
    for language in languages {
        let manifest = manifest.to_path_buf();
        tasks.spawn(async move { validate_language(language, &manifest).await });
    }

    let mut checks = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let check = joined.map_err(|e| DetectError::Join(e.to_string()))??;
        checks.push(check);
    }
    checks.sort_by_key(|c| c.language);
    Ok(checks)
}

/// Validate a single language against the manifest at `manifest`.
pub async fn validate_language(
    language: Language,
    manifest: &Path,
) -> Result<LibraryCheck, DetectError> {
    if !requires_client_library(language) {
        return Ok(LibraryCheck {
            language,
            status: LibraryStatus::NotRequired,
        });
    }

    let Some(json) = read_manifest(manifest).await else {
        tracing::warn!(
            path = %manifest.display(),
            "Could not read package.json. Skipping recap.dev library validation - please make sure you have it installed!"
        );
        return Ok(LibraryCheck {
            language,
            status: LibraryStatus::Unverified,
        });
    };

    if !declared_dependencies(&json).any(|dep| dep == CLIENT_LIBRARY) {
        return Err(DetectError::MissingDependency {
            library: CLIENT_LIBRARY,
            language,
            manifest: manifest.to_path_buf(),
        });
    }

    tracing::debug!(path = %manifest.display(), %language, "client library declared");
    Ok(LibraryCheck {
        language,
        status: LibraryStatus::Declared,
    })
}

async fn read_manifest(path: &Path) -> Option<serde_json::Value> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    serde_json::from_str(&contents).ok()
}

/// Keys of the manifest's `dependencies` object; nothing if it is absent or
/// not an object.
fn declared_dependencies(json: &serde_json::Value) -> impl Iterator<Item = &str> {
    json.get("dependencies")
        .and_then(|v| v.as_object())
        .into_iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_runtime_dependencies_count() {
        let manifest = json!({
            "dependencies": { "lodash": "^4" },
            "devDependencies": { "@recap.dev/client": "^1" }
        });
        let deps: Vec<_> = declared_dependencies(&manifest).collect();
        assert_eq!(deps, vec!["lodash"]);
    }

    #[test]
    fn dependencies_of_wrong_shape_are_empty() {
        let manifest = json!({ "dependencies": ["@recap.dev/client"] });
        assert_eq!(declared_dependencies(&manifest).count(), 0);
        assert_eq!(declared_dependencies(&json!({})).count(), 0);
    }

    #[test]
    fn manifest_path_prefers_configured_path() {
        let service = Path::new("/srv/app");
        let prefix = Path::new("/srv");
        let mut cfg = RunConfig::default();
        assert_eq!(manifest_path(&cfg, service, prefix), PathBuf::from("/srv/package.json"));

        cfg.package_json_path = Some(PathBuf::from("config/package.json"));
        assert_eq!(
            manifest_path(&cfg, service, prefix),
            PathBuf::from("/srv/app/config/package.json")
        );

        cfg.package_json_path = Some(PathBuf::from("/abs/package.json"));
        assert_eq!(manifest_path(&cfg, service, prefix), PathBuf::from("/abs/package.json"));
    }

    #[test]
    fn only_node_requires_the_client() {
        assert!(requires_client_library(Language::Node));
        assert!(!requires_client_library(Language::TypeScript));
    }
}
