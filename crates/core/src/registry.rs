//! Loaded classifiers, one per panel.
//!
//! The registry is built once at startup and then shared read-only (behind an `Arc`) by every
//! request. Loading checks that each model's feature count matches its panel, so a panel
//! definition and its model cannot silently drift apart.

use crate::classifier::Classifier;
use crate::config::CoreConfig;
use crate::constants::MODEL_FILE_EXTENSIONS;
use crate::model::ModelFile;
use crate::panels::PanelId;
use crate::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: BTreeMap<PanelId, Arc<dyn Classifier>>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry described by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error if any present model file cannot be read, parsed or validated, or if
    /// `cfg.require_all_models()` is set and some panel has no model file.
    pub fn load(cfg: &CoreConfig) -> CoreResult<Self> {
        let registry = Self::load_dir(cfg.models_dir())?;

        let missing = registry.missing();
        if cfg.require_all_models() && !missing.is_empty() {
            return Err(CoreError::ModelsMissing(missing));
        }
        Ok(registry)
    }

    /// Load every panel model found in `dir`.
    ///
    /// Panels without a model file are left unregistered and logged.
    pub fn load_dir(dir: &Path) -> CoreResult<Self> {
        let mut registry = Self::new();

        for panel in PanelId::ALL {
            let Some(path) = find_model_file(dir, panel) else {
                tracing::warn!(
                    "no model file for panel {} in {}",
                    panel,
                    dir.display()
                );
                continue;
            };

            let classifier = ModelFile::from_path(&path)?
                .into_classifier()
                .map_err(|source| CoreError::InvalidModel {
                    path: path.clone(),
                    source,
                })?;
            registry.insert(panel, classifier)?;
            tracing::info!("loaded {} model from {}", panel, path.display());
        }

        Ok(registry)
    }

    /// Register a classifier after checking its feature count against the panel.
    pub fn insert(&mut self, panel: PanelId, classifier: Arc<dyn Classifier>) -> CoreResult<()> {
        let expected = panel.spec().fields.len();
        let actual = classifier.n_features();
        if expected != actual {
            return Err(CoreError::ModelFeatureMismatch {
                panel,
                expected,
                actual,
            });
        }
        self.models.insert(panel, classifier);
        Ok(())
    }

    /// Register a classifier without the feature-count check done by [`Self::insert`].
    ///
    /// A mismatched classifier registered this way fails at dispatch time instead.
    pub fn with_classifier(mut self, panel: PanelId, classifier: Arc<dyn Classifier>) -> Self {
        self.models.insert(panel, classifier);
        self
    }

    pub fn get(&self, panel: PanelId) -> Option<&dyn Classifier> {
        self.models.get(&panel).map(|c| c.as_ref())
    }

    pub fn is_loaded(&self, panel: PanelId) -> bool {
        self.models.contains_key(&panel)
    }

    /// Panels with no registered classifier, in menu order.
    pub fn missing(&self) -> Vec<PanelId> {
        PanelId::ALL
            .into_iter()
            .filter(|p| !self.is_loaded(*p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn find_model_file(dir: &Path, panel: PanelId) -> Option<PathBuf> {
    let stem = panel.model_file_stem();
    MODEL_FILE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use tempfile::TempDir;

    fn linear_yaml(n: usize) -> String {
        let weights = vec!["0.1"; n].join(", ");
        format!("kind: linear\nweights: [{weights}]\nintercept: 0\n")
    }

    #[test]
    fn test_load_dir_registers_present_models() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("diabetes_model.yaml"), linear_yaml(8)).unwrap();
        std::fs::write(dir.path().join("anaemia_model.yml"), linear_yaml(5)).unwrap();

        let registry = ModelRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.is_loaded(PanelId::Diabetes));
        assert!(registry.is_loaded(PanelId::Anaemia));
        assert!(!registry.is_loaded(PanelId::HeartDisease));
        assert_eq!(registry.missing().len(), 5);
    }

    #[test]
    fn test_load_dir_prefers_yaml_over_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("anaemia_model.yaml"), linear_yaml(5)).unwrap();
        std::fs::write(dir.path().join("anaemia_model.json"), "not json").unwrap();

        let registry = ModelRegistry::load_dir(dir.path()).unwrap();
        assert!(registry.is_loaded(PanelId::Anaemia));
    }

    #[test]
    fn test_load_dir_rejects_feature_count_drift() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("diabetes_model.yaml"), linear_yaml(7)).unwrap();

        let err = ModelRegistry::load_dir(dir.path()).expect_err("should reject drift");
        assert!(matches!(
            err,
            CoreError::ModelFeatureMismatch {
                panel: PanelId::Diabetes,
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_load_dir_reports_invalid_model() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("anaemia_model.yaml"),
            "kind: linear\nweights: []\nintercept: 0\n",
        )
        .unwrap();

        let err = ModelRegistry::load_dir(dir.path()).expect_err("should reject");
        assert!(matches!(err, CoreError::InvalidModel { .. }));
    }

    #[test]
    fn test_load_requires_all_models_when_configured() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("diabetes_model.yaml"), linear_yaml(8)).unwrap();

        let lenient = CoreConfig::new(dir.path().to_path_buf(), false).unwrap();
        assert_eq!(ModelRegistry::load(&lenient).unwrap().len(), 1);

        let strict = CoreConfig::new(dir.path().to_path_buf(), true).unwrap();
        let err = ModelRegistry::load(&strict).expect_err("should require all");
        match err {
            CoreError::ModelsMissing(missing) => {
                assert_eq!(missing.len(), 6);
                assert!(!missing.contains(&PanelId::Diabetes));
            }
            other => panic!("Expected ModelsMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_checks_feature_count() {
        let mut registry = ModelRegistry::new();
        let model = Arc::new(LinearModel {
            weights: vec![1.0; 4],
            intercept: 0.0,
            scaler: None,
            threshold: 0.0,
        });
        assert!(registry.insert(PanelId::Anaemia, model.clone()).is_err());

        let registry = registry.with_classifier(PanelId::Anaemia, model);
        assert!(registry.is_loaded(PanelId::Anaemia));
    }
}
