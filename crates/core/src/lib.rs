//! # Health Assistant Core
//!
//! Core logic for the multiple disease prediction system.
//!
//! This crate contains the panel definitions and the path from a submitted form to a
//! diagnosis message:
//! - [`panels`]: the seven declarative panel specifications
//! - [`form`]: the form collector producing a raw submission
//! - [`dispatch`]: validation, coercion and classifier dispatch
//! - [`classifier`], [`model`], [`registry`]: the classifier capability, exported model formats
//!   and the models loaded at startup
//!
//! **No API concerns**: HTTP servers, HTML rendering and the CLI belong in `api-rest`,
//! `api-shared` and `cli`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod model;
pub mod panels;
pub mod registry;
pub mod service;
pub mod validation;

pub use classifier::{Classifier, ClassifierError, ClassifierResult};
pub use config::CoreConfig;
pub use constants::{DEFAULT_MODELS_DIR, DEFAULT_REST_ADDR};
pub use dispatch::{Diagnosis, DispatchError, FeatureVector, InferenceDispatcher};
pub use error::{CoreError, CoreResult};
pub use form::{FormCollector, FormError, RawSubmission, RawValue};
pub use panels::{Choice, FieldKind, FieldSpec, PanelId, PanelSpec};
pub use registry::ModelRegistry;
pub use service::{DiagnoseError, DiagnosisService, ErrorKind};
