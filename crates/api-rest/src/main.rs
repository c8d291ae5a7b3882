//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the panel pages and JSON API without the workspace runner.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP layer on its own. The workspace's main
//! `health-assistant-run` binary additionally loads a `.env` file before starting the same router.

use api_rest::{core_config_from_env, router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the standalone REST server
///
/// # Environment Variables
/// - `HA_REST_ADDR`: address to bind (default: "0.0.0.0:3000")
/// - `HA_MODELS_DIR`: directory holding the exported models (default: "saved_models")
/// - `HA_REQUIRE_ALL_MODELS`: refuse to start unless all seven models load (default: false)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("ha_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr =
        std::env::var("HA_REST_ADDR").unwrap_or_else(|_| ha_core::DEFAULT_REST_ADDR.into());

    let cfg = core_config_from_env()?;
    let state = AppState::load(&cfg)?;

    tracing::info!("-- Starting Health Assistant REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
