//! API error types with structured JSON responses.

use api_shared::{ErrorDetail, ErrorRes};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ha_core::{DiagnoseError, ErrorKind, PanelId};

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Diagnose(#[from] DiagnoseError),
}

/// Status code and machine-readable code for a failed submission.
pub(crate) fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::MissingField => (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_FIELDS"),
        ErrorKind::InvalidValue => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_VALUE"),
        ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "UNKNOWN_FIELD"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

/// Resolve a URL slug to a panel.
pub(crate) fn parse_panel(slug: &str) -> Result<PanelId, ApiError> {
    slug.parse::<PanelId>()
        .map_err(|_| ApiError::NotFound(format!("no panel named '{slug}'")))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone(), vec![])
            }
            ApiError::Diagnose(e) => {
                let (status, code) = status_for(e.kind());
                if e.kind() == ErrorKind::Internal {
                    tracing::error!("Predict error: {:?}", e);
                    (
                        status,
                        code,
                        "An internal error occurred".to_string(),
                        vec![],
                    )
                } else {
                    (status, code, e.to_string(), e.fields())
                }
            }
        };

        let body = ErrorRes {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}
