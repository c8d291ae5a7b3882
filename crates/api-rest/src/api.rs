//! JSON endpoints.

use api_shared::{HealthRes, HealthService, ListPanelsRes, PanelRes, PanelSummary, PredictReq, PredictRes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use ha_core::PanelId;

use crate::error::{parse_panel, ApiError};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes),
        (status = 503, description = "No classifier is loaded", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status and the number of panels that can serve predictions.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthRes>) {
    let res = HealthService::check_health(state.service.dispatcher().models().len());
    let status = if res.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(res))
}

#[utoipa::path(
    get,
    path = "/api/panels",
    responses(
        (status = 200, description = "All panels in menu order", body = ListPanelsRes)
    )
)]
/// List every panel and whether it can currently serve predictions.
#[axum::debug_handler]
pub async fn list_panels(State(state): State<AppState>) -> Json<ListPanelsRes> {
    let panels = PanelId::ALL
        .into_iter()
        .map(|p| PanelSummary::from_spec(p.spec(), state.service.is_available(p)))
        .collect();
    Json(ListPanelsRes { panels })
}

#[utoipa::path(
    get,
    path = "/api/panels/{slug}",
    params(("slug" = String, Path, description = "Panel slug, e.g. heart-disease")),
    responses(
        (status = 200, description = "Panel description", body = PanelRes),
        (status = 404, description = "Unknown panel", body = api_shared::ErrorRes)
    )
)]
/// Describe one panel: its fields in classifier order, choices and diagnosis messages.
#[axum::debug_handler]
pub async fn get_panel(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PanelRes>, ApiError> {
    let panel = parse_panel(&slug)?;
    Ok(Json(PanelRes::from_spec(
        panel.spec(),
        state.service.is_available(panel),
    )))
}

#[utoipa::path(
    post,
    path = "/api/panels/{slug}/predict",
    params(("slug" = String, Path, description = "Panel slug, e.g. heart-disease")),
    request_body = PredictReq,
    responses(
        (status = 200, description = "Diagnosis", body = PredictRes),
        (status = 400, description = "Unknown field", body = api_shared::ErrorRes),
        (status = 404, description = "Unknown panel", body = api_shared::ErrorRes),
        (status = 422, description = "Missing or invalid values", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// Submit one panel's values and get the diagnosis
///
/// Every field of the panel is required. Numeric fields take their value as a string and are
/// parsed server-side; categorical fields take the choice label.
///
/// # Errors
/// - `422 MISSING_FIELDS` if any field is empty; the classifier is not called.
/// - `422 INVALID_VALUE` if a value is not a number or not one of the choices.
/// - `500 INTERNAL` if the panel's model is missing or rejects the feature vector.
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<PredictReq>,
) -> Result<Json<PredictRes>, ApiError> {
    let panel = parse_panel(&slug)?;
    let diagnosis = state.service.diagnose(panel, req.values)?;
    Ok(Json(PredictRes::from(diagnosis)))
}
