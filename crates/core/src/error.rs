#[allow(clippy::single_component_path_imports)]
use serde_yaml;

use crate::classifier::ClassifierError;
use crate::panels::PanelId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("models directory does not exist: {}", .0.display())]
    ModelsDirMissing(std::path::PathBuf),
    #[error("failed to read model file {path}: {source}", path = path.display())]
    ModelRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to deserialize YAML model {path}: {source}", path = path.display())]
    YamlDeserialization {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to deserialize JSON model {path}: {source}", path = path.display())]
    JsonDeserialization {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported model file extension: {}", .0.display())]
    UnsupportedModelFormat(std::path::PathBuf),
    #[error("invalid model {path}: {source}", path = path.display())]
    InvalidModel {
        path: std::path::PathBuf,
        #[source]
        source: ClassifierError,
    },
    #[error("{panel} model expects {actual} features but the panel declares {expected}")]
    ModelFeatureMismatch {
        panel: PanelId,
        expected: usize,
        actual: usize,
    },
    #[error("no model found for panel(s): {}", .0.iter().map(|p| p.slug()).collect::<Vec<_>>().join(", "))]
    ModelsMissing(Vec<PanelId>),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
