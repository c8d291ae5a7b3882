//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read environment variables; the binaries
//! read them once and build a [`CoreConfig`].

use crate::constants::DEFAULT_MODELS_DIR;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    models_dir: PathBuf,
    require_all_models: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The models directory must exist; the individual model files are checked when the
    /// registry loads them.
    pub fn new(models_dir: PathBuf, require_all_models: bool) -> CoreResult<Self> {
        if !models_dir.is_dir() {
            return Err(CoreError::ModelsDirMissing(models_dir));
        }

        Ok(Self {
            models_dir,
            require_all_models,
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn require_all_models(&self) -> bool {
        self.require_all_models
    }
}

/// Resolve the models directory without reading environment variables.
///
/// If `override_dir` is provided, it must be a directory. Otherwise this searches for
/// `saved_models/` relative to the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR`.
pub fn resolve_models_dir(override_dir: Option<PathBuf>) -> CoreResult<PathBuf> {
    if let Some(dir) = override_dir {
        if dir.is_dir() {
            return Ok(dir);
        }
        return Err(CoreError::InvalidInput(format!(
            "HA_MODELS_DIR override is not a directory: {}",
            dir.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_MODELS_DIR);
    if cwd_relative.is_dir() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_MODELS_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(CoreError::InvalidInput(format!(
        "could not locate {DEFAULT_MODELS_DIR}/ directory"
    )))
}

/// Parse the "require all models" flag from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `false`.
pub fn require_all_models_from_env_value(value: Option<String>) -> CoreResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(CoreError::InvalidInput(format!(
            "HA_REQUIRE_ALL_MODELS must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_rejects_missing_models_dir() {
        let err = CoreConfig::new(PathBuf::from("/definitely/not/here"), false)
            .expect_err("should reject missing directory");
        assert!(matches!(err, CoreError::ModelsDirMissing(_)));
    }

    #[test]
    fn test_new_accepts_existing_dir() {
        let dir = TempDir::new().unwrap();
        let cfg = CoreConfig::new(dir.path().to_path_buf(), true).unwrap();
        assert_eq!(cfg.models_dir(), dir.path());
        assert!(cfg.require_all_models());
    }

    #[test]
    fn test_resolve_models_dir_uses_override() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_models_dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_resolve_models_dir_rejects_file_override() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("model.yaml");
        std::fs::write(&file, "kind: linear").unwrap();

        let err = resolve_models_dir(Some(file)).expect_err("should reject a file");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("not a directory")));
    }

    #[test]
    fn test_resolve_models_dir_finds_workspace_models() {
        // saved_models/ sits at the workspace root, above this crate's manifest.
        let resolved = resolve_models_dir(None).unwrap();
        assert!(resolved.ends_with(DEFAULT_MODELS_DIR));
        assert!(resolved.is_dir());
    }

    #[test]
    fn test_require_all_models_parsing() {
        assert!(!require_all_models_from_env_value(None).unwrap());
        assert!(!require_all_models_from_env_value(Some("  ".into())).unwrap());
        assert!(require_all_models_from_env_value(Some("TRUE".into())).unwrap());
        assert!(require_all_models_from_env_value(Some("1".into())).unwrap());
        assert!(!require_all_models_from_env_value(Some("no".into())).unwrap());

        let err = require_all_models_from_env_value(Some("maybe".into()))
            .expect_err("should reject non-boolean");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("maybe")));
    }
}
