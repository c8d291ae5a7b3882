//! Request and response bodies shared by the HTTP surfaces.

use ha_core::{Diagnosis, FieldKind, FieldSpec, PanelSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Number of panels with a loaded classifier.
    pub panels_available: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChoiceRes {
    pub label: String,
    pub code: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKindRes {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldRes {
    pub key: String,
    pub label: String,
    pub kind: FieldKindRes,
    /// Empty for numeric fields.
    pub choices: Vec<ChoiceRes>,
}

impl From<&FieldSpec> for FieldRes {
    fn from(field: &FieldSpec) -> Self {
        let kind = match field.kind {
            FieldKind::Numeric => FieldKindRes::Numeric,
            FieldKind::Categorical(_) => FieldKindRes::Categorical,
        };
        Self {
            key: field.key.to_owned(),
            label: field.label.to_owned(),
            kind,
            choices: field
                .choices()
                .iter()
                .map(|c| ChoiceRes {
                    label: c.label.to_owned(),
                    code: c.code,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelSummary {
    pub slug: String,
    pub title: String,
    pub menu_label: String,
    /// Whether a classifier is loaded for this panel.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPanelsRes {
    pub panels: Vec<PanelSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelRes {
    pub slug: String,
    pub title: String,
    pub menu_label: String,
    pub submit_label: String,
    pub available: bool,
    /// In classifier feature order.
    pub fields: Vec<FieldRes>,
    pub positive: String,
    pub negative: String,
}

impl PanelSummary {
    pub fn from_spec(spec: &PanelSpec, available: bool) -> Self {
        Self {
            slug: spec.id.slug().to_owned(),
            title: spec.title.to_owned(),
            menu_label: spec.menu_label.to_owned(),
            available,
        }
    }
}

impl PanelRes {
    pub fn from_spec(spec: &PanelSpec, available: bool) -> Self {
        Self {
            slug: spec.id.slug().to_owned(),
            title: spec.title.to_owned(),
            menu_label: spec.menu_label.to_owned(),
            submit_label: spec.submit_label.to_owned(),
            available,
            fields: spec.fields.iter().map(FieldRes::from).collect(),
            positive: spec.positive.to_owned(),
            negative: spec.negative.to_owned(),
        }
    }
}

/// Values keyed by field key. Categorical fields take the choice label, e.g. `"Female"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictReq {
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictRes {
    pub panel: String,
    /// Raw classifier label.
    pub label: i64,
    pub positive: bool,
    pub diagnosis: String,
    /// The feature vector passed to the classifier.
    pub features: Vec<f64>,
}

impl From<Diagnosis> for PredictRes {
    fn from(diagnosis: Diagnosis) -> Self {
        Self {
            panel: diagnosis.panel.slug().to_owned(),
            label: diagnosis.label,
            positive: diagnosis.positive,
            diagnosis: diagnosis.message.to_owned(),
            features: diagnosis.features.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// Fields the error refers to, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Structured error body for API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorDetail,
}
