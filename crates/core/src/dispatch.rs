//! Validate-coerce-dispatch, shared by every panel.
//!
//! A [`RawSubmission`] becomes a [`Diagnosis`] in five steps:
//!
//! 1. every field must be filled in, otherwise [`DispatchError::MissingFields`] is returned
//!    before any value is parsed;
//! 2. free-text values are parsed as finite numbers, otherwise
//!    [`DispatchError::InvalidNumbers`];
//! 3. the values are assembled in the panel's field order;
//! 4. the panel's classifier predicts a label;
//! 5. label `1` maps to the panel's positive message, anything else to the negative one.
//!
//! Steps 1 and 2 are user errors. A classifier failure in step 4 means the panel definition and
//! the deployed model disagree, which is a configuration defect and is reported as such.

use crate::classifier::ClassifierError;
use crate::form::{RawSubmission, RawValue};
use crate::panels::PanelId;
use crate::registry::ModelRegistry;
use crate::validation::{is_blank, parse_feature};
use std::fmt;
use std::sync::Arc;

/// Ordered classifier input, one value per panel field.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// A field whose text could not be parsed as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidValue {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.field, self.value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("please fill in all fields; missing: {}", .fields.join(", "))]
    MissingFields {
        panel: PanelId,
        fields: Vec<&'static str>,
    },
    #[error(
        "please enter valid numeric values; not a number: {}",
        .invalid.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    InvalidNumbers {
        panel: PanelId,
        invalid: Vec<InvalidValue>,
    },
    #[error("no classifier is loaded for {0}")]
    ModelUnavailable(PanelId),
    #[error("{panel} classifier rejected the feature vector: {source}")]
    Classifier {
        panel: PanelId,
        #[source]
        source: ClassifierError,
    },
}

impl DispatchError {
    /// `true` for errors the user can fix by correcting the form.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingFields { .. } | DispatchError::InvalidNumbers { .. }
        )
    }
}

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// The outcome of one successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub panel: PanelId,
    /// Raw classifier label.
    pub label: i64,
    pub positive: bool,
    pub message: &'static str,
    pub features: FeatureVector,
}

/// Check completeness, coerce, and assemble the feature vector for `submission`.
///
/// The vector follows the field order of the submission's own panel.
pub fn validate(submission: &RawSubmission) -> DispatchResult<FeatureVector> {
    let spec = submission.spec();
    let values = submission.values();

    let missing: Vec<&'static str> = spec
        .fields
        .iter()
        .zip(values)
        .filter(|(_, value)| match value {
            None => true,
            Some(RawValue::Text(text)) => is_blank(text),
            Some(RawValue::Code(_)) => false,
        })
        .map(|(field, _)| field.label)
        .collect();
    if !missing.is_empty() {
        return Err(DispatchError::MissingFields {
            panel: spec.id,
            fields: missing,
        });
    }

    let mut features = Vec::with_capacity(spec.fields.len());
    let mut invalid = Vec::new();
    for (field, value) in spec.fields.iter().zip(values) {
        match value {
            Some(RawValue::Code(code)) => features.push(*code),
            Some(RawValue::Text(text)) => match parse_feature(text) {
                Some(number) => features.push(number),
                None => invalid.push(InvalidValue {
                    field: field.label,
                    value: text.clone(),
                }),
            },
            None => {}
        }
    }
    if !invalid.is_empty() {
        return Err(DispatchError::InvalidNumbers {
            panel: spec.id,
            invalid,
        });
    }

    Ok(FeatureVector(features))
}

/// Runs submissions against the shared, read-only model registry.
#[derive(Debug, Clone)]
pub struct InferenceDispatcher {
    models: Arc<ModelRegistry>,
}

impl InferenceDispatcher {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Turn one submission into a diagnosis.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::MissingFields`] / [`DispatchError::InvalidNumbers`] for user input
    ///   problems; the classifier is not called.
    /// - [`DispatchError::ModelUnavailable`] when the panel has no loaded model.
    /// - [`DispatchError::Classifier`] when the model rejects the vector.
    pub fn dispatch(&self, submission: &RawSubmission) -> DispatchResult<Diagnosis> {
        let spec = submission.spec();
        let features = validate(submission)?;

        let classifier = self
            .models
            .get(spec.id)
            .ok_or(DispatchError::ModelUnavailable(spec.id))?;

        if classifier.n_features() != features.len() {
            return Err(DispatchError::Classifier {
                panel: spec.id,
                source: ClassifierError::FeatureCountMismatch {
                    expected: classifier.n_features(),
                    actual: features.len(),
                },
            });
        }

        tracing::debug!(panel = %spec.id, features = ?features.as_slice(), "dispatching");
        let label = classifier
            .predict(features.as_slice())
            .map_err(|source| DispatchError::Classifier {
                panel: spec.id,
                source,
            })?;

        let positive = label == 1;
        tracing::info!(panel = %spec.id, positive, "diagnosis produced");

        Ok(Diagnosis {
            panel: spec.id,
            label,
            positive,
            message: spec.message_for(label),
            features,
        })
    }
}
