//! # API REST
//!
//! HTTP surface for the Health Assistant.
//!
//! Handles:
//! - Server-rendered panel pages (`/panels/{slug}`) with a panel selection menu
//! - JSON endpoints with axum and their OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS)
//!
//! Uses `api-shared` for request/response bodies and `ha-core` for the diagnosis logic.

#![warn(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use ha_core::{
    config::{require_all_models_from_env_value, resolve_models_dir},
    CoreConfig, CoreResult, DiagnosisService, ModelRegistry,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across request handlers
///
/// Holds the diagnosis service, which owns the read-only model registry loaded at startup.
#[derive(Clone)]
pub struct AppState {
    pub service: DiagnosisService,
}

impl AppState {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self {
            service: DiagnosisService::new(models),
        }
    }

    /// Load every model named by `cfg` and build the state.
    pub fn load(cfg: &CoreConfig) -> CoreResult<Self> {
        let registry = ModelRegistry::load(cfg)?;
        tracing::info!(
            "loaded {} of {} panel models from {}",
            registry.len(),
            ha_core::PanelId::ALL.len(),
            cfg.models_dir().display()
        );
        Ok(Self::new(Arc::new(registry)))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(api::health, api::list_panels, api::get_panel, api::predict),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ListPanelsRes,
        api_shared::PanelSummary,
        api_shared::PanelRes,
        api_shared::FieldRes,
        api_shared::FieldKindRes,
        api_shared::ChoiceRes,
        api_shared::PredictReq,
        api_shared::PredictRes,
        api_shared::ErrorRes,
        api_shared::ErrorDetail,
    ))
)]
pub struct ApiDoc;

/// Build the application router: panel pages, JSON API and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route(
            "/panels/:slug",
            get(pages::show_panel).post(pages::submit_panel),
        )
        .route("/health", get(api::health))
        .route("/api/panels", get(api::list_panels))
        .route("/api/panels/:slug", get(api::get_panel))
        .route("/api/panels/:slug/predict", post(api::predict))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve the core configuration from the process environment.
///
/// Only the binaries call this, once at startup.
///
/// # Environment Variables
/// - `HA_MODELS_DIR`: directory holding the exported models (default: `saved_models/`)
/// - `HA_REQUIRE_ALL_MODELS`: refuse to start unless every panel has a model (default: false)
pub fn core_config_from_env() -> CoreResult<CoreConfig> {
    let models_dir = resolve_models_dir(std::env::var("HA_MODELS_DIR").ok().map(PathBuf::from))?;
    let require_all = require_all_models_from_env_value(std::env::var("HA_REQUIRE_ALL_MODELS").ok())?;
    CoreConfig::new(models_dir, require_all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::{ErrorRes, HealthRes, ListPanelsRes, PanelRes, PredictRes};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use ha_core::model::LinearModel;
    use ha_core::PanelId;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Anaemia model: positive when hemoglobin < 12. Diabetes model trained on the wrong
    /// number of features, to exercise the configuration-defect path.
    fn test_state() -> AppState {
        let anaemia = Arc::new(LinearModel {
            weights: vec![0.0, -1.0, 0.0, 0.0, 0.0],
            intercept: 12.0,
            scaler: None,
            threshold: 0.0,
        });
        let drifted = Arc::new(LinearModel {
            weights: vec![1.0; 7],
            intercept: 0.0,
            scaler: None,
            threshold: 0.0,
        });
        let registry = ModelRegistry::new()
            .with_classifier(PanelId::Anaemia, anaemia)
            .with_classifier(PanelId::Diabetes, drifted);
        AppState::new(Arc::new(registry))
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn anaemia_values(hemoglobin: &str) -> serde_json::Value {
        serde_json::json!({
            "values": {
                "gender": "Female",
                "hemoglobin": hemoglobin,
                "mch": "22.1",
                "mchc": "29.4",
                "mcv": "83.0"
            }
        })
    }

    #[tokio::test]
    async fn test_health_reports_loaded_panels() {
        let response = router(test_state()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let res: HealthRes = body_json(response).await;
        assert!(res.ok);
        assert_eq!(res.panels_available, 2);
    }

    #[tokio::test]
    async fn test_health_unavailable_without_models() {
        let state = AppState::new(Arc::new(ModelRegistry::new()));
        let response = router(state).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_panels() {
        let response = router(test_state())
            .oneshot(get("/api/panels"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let res: ListPanelsRes = body_json(response).await;
        let slugs: Vec<&str> = res.panels.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "diabetes",
                "heart-disease",
                "parkinsons",
                "lung-cancer",
                "anaemia",
                "hypertension",
                "alzheimers"
            ]
        );
        assert!(res.panels[4].available);
        assert!(!res.panels[1].available);
    }

    #[tokio::test]
    async fn test_get_panel() {
        let response = router(test_state())
            .oneshot(get("/api/panels/heart-disease"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let res: PanelRes = body_json(response).await;
        assert_eq!(res.fields.len(), 13);
        assert_eq!(res.fields[12].key, "thal");
        assert_eq!(res.fields[12].choices.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_panel_is_404() {
        let response = router(test_state())
            .oneshot(get("/api/panels/kidney"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let res: ErrorRes = body_json(response).await;
        assert_eq!(res.error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_predict_positive_and_negative() {
        let app = router(test_state());

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/panels/anaemia/predict",
                anaemia_values("9.8"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let res: PredictRes = body_json(response).await;
        assert_eq!(res.diagnosis, "The person has anaemia");
        assert_eq!(res.label, 1);
        assert_eq!(res.features, vec![0.0, 9.8, 22.1, 29.4, 83.0]);

        let response = app
            .oneshot(json_post(
                "/api/panels/anaemia/predict",
                anaemia_values("14.5"),
            ))
            .await
            .unwrap();
        let res: PredictRes = body_json(response).await;
        assert_eq!(res.diagnosis, "The person does not have anaemia");
        assert!(!res.positive);
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_422() {
        let response = router(test_state())
            .oneshot(json_post(
                "/api/panels/anaemia/predict",
                anaemia_values(""),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res: ErrorRes = body_json(response).await;
        assert_eq!(res.error.code, "MISSING_FIELDS");
        assert_eq!(res.error.fields, vec!["Hemoglobin Level".to_string()]);
    }

    #[tokio::test]
    async fn test_predict_non_numeric_is_422_invalid_value() {
        let response = router(test_state())
            .oneshot(json_post(
                "/api/panels/anaemia/predict",
                anaemia_values("low"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res: ErrorRes = body_json(response).await;
        assert_eq!(res.error.code, "INVALID_VALUE");
        assert!(res.error.message.contains("low"));
    }

    #[tokio::test]
    async fn test_predict_unknown_field_is_400() {
        let response = router(test_state())
            .oneshot(json_post(
                "/api/panels/anaemia/predict",
                serde_json::json!({ "values": { "ferritin": "30" } }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let res: ErrorRes = body_json(response).await;
        assert_eq!(res.error.code, "UNKNOWN_FIELD");
    }

    #[tokio::test]
    async fn test_predict_model_drift_is_500_without_details() {
        let values = serde_json::json!({
            "values": {
                "pregnancies": "2",
                "glucose": "120",
                "blood_pressure": "70",
                "skin_thickness": "20",
                "insulin": "80",
                "bmi": "25.0",
                "diabetes_pedigree_function": "0.5",
                "age": "33"
            }
        });
        let response = router(test_state())
            .oneshot(json_post("/api/panels/diabetes/predict", values))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res: ErrorRes = body_json(response).await;
        assert_eq!(res.error.code, "INTERNAL");
        assert!(!res.error.message.contains("features"));
    }

    #[tokio::test]
    async fn test_predict_without_model_is_500() {
        let response = router(test_state())
            .oneshot(json_post(
                "/api/panels/alzheimers/predict",
                serde_json::json!({
                    "values": {
                        "gender": "Male", "age": "75", "educ": "12", "ses": "2",
                        "mmse": "27", "etiv": "1500", "nwbv": "0.72", "asf": "1.17"
                    }
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_index_redirects_to_first_panel() {
        let response = router(test_state()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/panels/diabetes"
        );
    }

    #[tokio::test]
    async fn test_panel_page_renders_form() {
        let response = router(test_state())
            .oneshot(get("/panels/heart-disease"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<h1>Heart Disease</h1>"));
        assert!(html.contains("<select name=\"sex\">"));
        assert!(html.contains("<option selected>Male</option>"));
        assert!(html.contains("Heart Disease Test Result"));
        // No model registered for this panel in the test state.
        assert!(html.contains("predictions are unavailable"));
        assert!(!html.contains("class=\"success\""));
    }

    #[tokio::test]
    async fn test_panel_page_grid_follows_panel_columns() {
        let app = router(test_state());
        for (slug, columns) in [("parkinsons", 5), ("anaemia", 2), ("diabetes", 3)] {
            let response = app.clone().oneshot(get(&format!("/panels/{slug}"))).await.unwrap();
            let html = body_string(response).await;
            assert!(
                html.contains(&format!("grid-template-columns:repeat({columns},1fr)")),
                "{slug}"
            );
        }
    }

    #[tokio::test]
    async fn test_panel_page_submit_shows_diagnosis() {
        let response = router(test_state())
            .oneshot(form_post(
                "/panels/anaemia",
                "gender=Female&hemoglobin=9.8&mch=22.1&mchc=29.4&mcv=83.0",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<div class=\"success\">The person has anaemia</div>"));
        // Entered values are kept on the re-rendered form.
        assert!(html.contains("name=\"hemoglobin\" value=\"9.8\""));
        assert!(html.contains("<option selected>Female</option>"));
    }

    #[tokio::test]
    async fn test_panel_page_submit_shows_missing_fields() {
        let response = router(test_state())
            .oneshot(form_post(
                "/panels/anaemia",
                "gender=Male&hemoglobin=&mch=22.1&mchc=29.4&mcv=83.0",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_string(response).await;
        assert!(html.contains("please fill in all fields"));
        assert!(html.contains("Hemoglobin Level"));
    }

    #[tokio::test]
    async fn test_panel_page_submit_escapes_rejected_input() {
        let response = router(test_state())
            .oneshot(form_post(
                "/panels/anaemia",
                "gender=Male&hemoglobin=%3Cscript%3E&mch=22.1&mchc=29.4&mcv=83.0",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_string(response).await;
        assert!(html.contains("please enter valid numeric values"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_panel_page_ignores_submit_button_key() {
        let response = router(test_state())
            .oneshot(form_post(
                "/panels/anaemia",
                "gender=Female&hemoglobin=14&mch=22.1&mchc=29.4&mcv=83.0&submit=Anaemia+Test+Result",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("The person does not have anaemia"));
    }

    #[tokio::test]
    async fn test_unknown_panel_page_is_404() {
        let response = router(test_state())
            .oneshot(get("/panels/kidney"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = router(test_state())
            .oneshot(get("/api-docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = body_json(response).await;
        assert!(doc["paths"].get("/api/panels/{slug}/predict").is_some());
    }
}
