use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{core_config_from_env, router, AppState};
use ha_core::PanelId;

/// Main entry point for the Health Assistant application
///
/// Loads the panel models once, then serves the panel pages, the JSON API and the Swagger UI
/// on a single REST server.
///
/// # Environment Variables
/// - `HA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HA_MODELS_DIR`: directory holding the exported models (default: "saved_models")
/// - `HA_REQUIRE_ALL_MODELS`: refuse to start unless every panel has a model (default: false)
///
/// A `.env` file in the working directory is loaded first, if present.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, model loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("health_assistant_run=info".parse()?)
                .add_directive("ha_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("HA_REST_ADDR").unwrap_or_else(|_| ha_core::DEFAULT_REST_ADDR.into());

    let cfg = core_config_from_env()?;
    let state = AppState::load(&cfg)?;

    let unavailable = state.service.dispatcher().models().missing();
    if !unavailable.is_empty() {
        let names: Vec<&str> = unavailable.iter().map(|p| p.slug()).collect();
        tracing::warn!(
            "{} of {} panels have no model and will not serve predictions: {}",
            unavailable.len(),
            PanelId::ALL.len(),
            names.join(", ")
        );
    }

    tracing::info!("++ Starting Health Assistant on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
