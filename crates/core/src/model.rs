//! Exported model formats.
//!
//! Trained models are exported from the training notebooks into YAML or JSON documents tagged
//! by `kind`. Three shapes cover the deployed panels:
//!
//! - `linear`: a weight vector and intercept, with an optional standard scaler. Covers linear
//!   SVMs and logistic regression, which both predict the positive class when the decision
//!   value is above zero.
//! - `tree`: a single decision tree stored as a flat node list.
//! - `forest`: several trees combined by majority vote.
//!
//! Documents are validated when converted into a [`Classifier`], so a malformed export fails at
//! startup rather than on the first request.

use crate::classifier::{check_feature_count, Classifier, ClassifierError, ClassifierResult};
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// A model document as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelFile {
    Linear(LinearModel),
    Tree(DecisionTree),
    Forest(RandomForest),
}

impl ModelFile {
    /// Read a model document, choosing the parser from the file extension.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CoreError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&contents).map_err(|source| CoreError::YamlDeserialization {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("json") => {
                serde_json::from_str(&contents).map_err(|source| CoreError::JsonDeserialization {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(CoreError::UnsupportedModelFormat(path.to_path_buf())),
        }
    }

    /// Validate the document and turn it into a shareable classifier.
    pub fn into_classifier(self) -> ClassifierResult<Arc<dyn Classifier>> {
        match self {
            ModelFile::Linear(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ModelFile::Tree(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ModelFile::Forest(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

/// Per-feature standardisation applied before the linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    /// Decision values strictly above this are labelled 1.
    #[serde(default)]
    pub threshold: f64,
}

impl LinearModel {
    fn validate(&self) -> ClassifierResult<()> {
        if self.weights.is_empty() {
            return Err(ClassifierError::InvalidModel(
                "linear model has no weights".into(),
            ));
        }
        if !self.weights.iter().all(|w| w.is_finite())
            || !self.intercept.is_finite()
            || !self.threshold.is_finite()
        {
            return Err(ClassifierError::InvalidModel(
                "linear model parameters must be finite".into(),
            ));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.weights.len() || scaler.scale.len() != self.weights.len()
            {
                return Err(ClassifierError::InvalidModel(format!(
                    "scaler has {} means and {} scales for {} weights",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    self.weights.len()
                )));
            }
            if !scaler.mean.iter().all(|m| m.is_finite())
                || !scaler.scale.iter().all(|s| s.is_finite() && *s != 0.0)
            {
                return Err(ClassifierError::InvalidModel(
                    "scaler means must be finite and scales finite and non-zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// Signed distance from the decision boundary.
    pub fn decision_function(&self, features: &[f64]) -> ClassifierResult<f64> {
        check_feature_count(self.weights.len(), features)?;

        let score = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&self.weights)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
                .sum::<f64>(),
            None => features
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| w * x)
                .sum::<f64>(),
        };
        Ok(score + self.intercept)
    }
}

impl Classifier for LinearModel {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &[f64]) -> ClassifierResult<i64> {
        let score = self.decision_function(features)?;
        Ok(if score > self.threshold { 1 } else { 0 })
    }
}

/// One node of a flattened decision tree.
///
/// A split sends rows with `x[feature] <= threshold` to `left` and the rest to `right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: i64,
    },
}

fn validate_nodes(nodes: &[TreeNode], n_features: usize) -> ClassifierResult<()> {
    if nodes.is_empty() {
        return Err(ClassifierError::InvalidModel("tree has no nodes".into()));
    }
    for (index, node) in nodes.iter().enumerate() {
        if let TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        } = node
        {
            if *feature >= n_features {
                return Err(ClassifierError::InvalidModel(format!(
                    "node {index} splits on feature {feature} of {n_features}"
                )));
            }
            if !threshold.is_finite() {
                return Err(ClassifierError::InvalidModel(format!(
                    "node {index} has a non-finite threshold"
                )));
            }
            // Children must point forward, which also rules out cycles.
            for child in [*left, *right] {
                if child <= index || child >= nodes.len() {
                    return Err(ClassifierError::InvalidModel(format!(
                        "node {index} points to invalid child {child}"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn walk(nodes: &[TreeNode], features: &[f64]) -> ClassifierResult<i64> {
    let mut index = 0;
    // A valid tree reaches a leaf in at most `nodes.len()` steps.
    for _ in 0..nodes.len() {
        match nodes.get(index) {
            Some(TreeNode::Leaf { leaf }) => return Ok(*leaf),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = features.get(*feature).ok_or_else(|| {
                    ClassifierError::InvalidModel(format!(
                        "node {index} splits on missing feature {feature}"
                    ))
                })?;
                index = if *value <= *threshold { *left } else { *right };
            }
            None => break,
        }
    }
    Err(ClassifierError::InvalidModel(
        "tree walk did not reach a leaf".into(),
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self) -> ClassifierResult<()> {
        if self.n_features == 0 {
            return Err(ClassifierError::InvalidModel(
                "tree declares zero features".into(),
            ));
        }
        validate_nodes(&self.nodes, self.n_features)
    }
}

impl Classifier for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &[f64]) -> ClassifierResult<i64> {
        check_feature_count(self.n_features, features)?;
        walk(&self.nodes, features)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<ForestTree>,
}

impl RandomForest {
    fn validate(&self) -> ClassifierResult<()> {
        if self.n_features == 0 {
            return Err(ClassifierError::InvalidModel(
                "forest declares zero features".into(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ClassifierError::InvalidModel("forest has no trees".into()));
        }
        self.trees
            .iter()
            .try_for_each(|tree| validate_nodes(&tree.nodes, self.n_features))
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Majority vote; ties go to the smallest label.
    fn predict(&self, features: &[f64]) -> ClassifierResult<i64> {
        check_feature_count(self.n_features, features)?;

        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(walk(&tree.nodes, features)?).or_default() += 1;
        }

        let mut best: Option<(i64, usize)> = None;
        for (label, count) in votes {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
            .ok_or_else(|| ClassifierError::InvalidModel("forest has no trees".into()))
    }
}
