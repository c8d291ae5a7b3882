//! Entry point used by the HTTP and CLI surfaces.
//!
//! [`DiagnosisService`] composes the form collector and the dispatcher so callers can go from
//! key/value pairs straight to a diagnosis, with one error type covering both stages.

use crate::dispatch::{Diagnosis, DispatchError, InferenceDispatcher};
use crate::form::{FormCollector, FormError};
use crate::panels::PanelId;
use crate::registry::ModelRegistry;
use std::sync::Arc;

/// Coarse classification of a failed submission, for choosing a status code or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// One or more required fields were empty.
    MissingField,
    /// A value could not be coerced (non-numeric text or an unknown choice).
    InvalidValue,
    /// The request named a field the panel does not have.
    BadRequest,
    /// Deployment or model defect; not the user's fault.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnoseError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl DiagnoseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiagnoseError::Form(FormError::UnknownField { .. }) => ErrorKind::BadRequest,
            DiagnoseError::Form(FormError::InvalidChoice { .. }) => ErrorKind::InvalidValue,
            DiagnoseError::Dispatch(DispatchError::MissingFields { .. }) => {
                ErrorKind::MissingField
            }
            DiagnoseError::Dispatch(DispatchError::InvalidNumbers { .. }) => {
                ErrorKind::InvalidValue
            }
            DiagnoseError::Dispatch(
                DispatchError::ModelUnavailable(_) | DispatchError::Classifier { .. },
            ) => ErrorKind::Internal,
        }
    }

    /// Labels of the fields the error refers to, if any.
    pub fn fields(&self) -> Vec<String> {
        match self {
            DiagnoseError::Form(FormError::UnknownField { key, .. }) => vec![key.clone()],
            DiagnoseError::Form(FormError::InvalidChoice { field, .. }) => {
                vec![(*field).to_owned()]
            }
            DiagnoseError::Dispatch(DispatchError::MissingFields { fields, .. }) => {
                fields.iter().map(|f| (*f).to_owned()).collect()
            }
            DiagnoseError::Dispatch(DispatchError::InvalidNumbers { invalid, .. }) => {
                invalid.iter().map(|v| v.field.to_owned()).collect()
            }
            DiagnoseError::Dispatch(_) => Vec::new(),
        }
    }
}

/// Pure diagnosis operations - no API concerns.
#[derive(Debug, Clone)]
pub struct DiagnosisService {
    dispatcher: InferenceDispatcher,
}

impl DiagnosisService {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self {
            dispatcher: InferenceDispatcher::new(models),
        }
    }

    pub fn dispatcher(&self) -> &InferenceDispatcher {
        &self.dispatcher
    }

    pub fn is_available(&self, panel: PanelId) -> bool {
        self.dispatcher.models().is_loaded(panel)
    }

    /// Collect `pairs` into a form for `panel` and dispatch it.
    pub fn diagnose<I, K, V>(&self, panel: PanelId, pairs: I) -> Result<Diagnosis, DiagnoseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let form = FormCollector::from_pairs(panel, pairs)?;
        self.diagnose_form(form)
    }

    /// Dispatch an already collected form.
    pub fn diagnose_form(&self, form: FormCollector) -> Result<Diagnosis, DiagnoseError> {
        let submission = form.submit();
        match self.dispatcher.dispatch(&submission) {
            Ok(diagnosis) => Ok(diagnosis),
            Err(e) if e.is_user_error() => {
                tracing::info!(panel = %submission.panel(), "submission rejected: {}", e);
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(panel = %submission.panel(), "dispatch failed: {:?}", e);
                Err(e.into())
            }
        }
    }
}
