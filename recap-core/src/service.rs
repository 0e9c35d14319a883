//! Loading and saving the service configuration document.
//!
//! # Lookup order
//!
//! ```text
//! <service dir>/
//!   serverless.yml
//!   serverless.yaml
//!   serverless.json   (parsed with the YAML parser)
//! ```
//!
//! Saving is atomic: serialize → `<file>.tmp` sibling → `rename`.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ServiceError};
use crate::types::Service;

/// Service file names probed by [`find_service_file`], in priority order.
pub const SERVICE_FILE_NAMES: &[&str] = &["serverless.yml", "serverless.yaml", "serverless.json"];

/// First existing service file inside `dir`.
pub fn find_service_file(dir: &Path) -> Result<PathBuf, ServiceError> {
    SERVICE_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .ok_or_else(|| ServiceError::NotFound {
            dir: dir.to_path_buf(),
            candidates: SERVICE_FILE_NAMES.join(", "),
        })
}

/// Load the service document at `path`.
///
/// Returns `ServiceError::Parse` (with path + line context) if malformed.
pub fn load_service_file(path: &Path) -> Result<Service, ServiceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ServiceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Find and load the service document in `dir`.
pub fn load_service_at(dir: &Path) -> Result<(PathBuf, Service), ServiceError> {
    let path = find_service_file(dir)?;
    let service = load_service_file(&path)?;
    Ok((path, service))
}

/// Atomically write `service` as YAML to `path`.
pub fn save_service_at(path: &Path, service: &Service) -> Result<(), ServiceError> {
    let yaml = serde_yaml::to_string(service)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "serverless.yml".to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn yml_wins_over_json() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("serverless.json"), "{}").unwrap();
        std::fs::write(dir.path().join("serverless.yml"), "service: a\n").unwrap();
        let path = find_service_file(dir.path()).expect("find");
        assert!(path.ends_with("serverless.yml"));
    }

    #[test]
    fn json_service_is_accepted() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("serverless.json"),
            r#"{"service": "a", "functions": {"f": {"handler": "x.y"}}}"#,
        )
        .unwrap();
        let (_, svc) = load_service_at(dir.path()).expect("load");
        assert_eq!(svc.function("f").unwrap().handler_str(), Some("x.y"));
    }

    #[test]
    fn missing_service_lists_candidates() {
        let dir = TempDir::new().expect("tempdir");
        let err = find_service_file(dir.path()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(err.to_string().contains("serverless.yml"));
    }

    #[test]
    fn atomic_save_cleans_up_tmp() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("out").join("serverless.yml");
        let svc: Service = serde_yaml::from_str("service: demo\n").unwrap();
        save_service_at(&path, &svc).expect("save");
        assert!(path.exists());
        assert!(!dir.path().join("out").join("serverless.yml.tmp").exists());
        assert_eq!(load_service_file(&path).unwrap(), svc);
    }
}
