//! The classifier capability consumed by the dispatcher.
//!
//! A classifier is an opaque, pre-trained binary predictor. Implementations must be immutable
//! after construction so a single instance can serve concurrent requests.

/// Errors raised by a classifier or while building one from an exported model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// The feature vector does not have the length the model was trained on.
    #[error("expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
    /// The exported model is structurally unusable.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

/// A pre-trained binary predictor.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Number of features the model was trained on.
    fn n_features(&self) -> usize;

    /// Predict the label for a single row. `1` is the positive class.
    fn predict(&self, features: &[f64]) -> ClassifierResult<i64>;
}

/// Reject rows whose length differs from what the model expects.
pub(crate) fn check_feature_count(expected: usize, features: &[f64]) -> ClassifierResult<()> {
    if features.len() != expected {
        return Err(ClassifierError::FeatureCountMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
