pub mod error;
pub mod routes;
pub mod state;

use aioep_core::gateway::GatewayConfig;
use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing; tests inject
/// their own gateway configuration instead of reading the environment.
pub fn build_router(root: PathBuf, gateway: GatewayConfig) -> Router {
    let app_state = state::AppState::new(root, gateway);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // AI generation primitive
        .route("/api/strategy/ai", post(routes::ai::generate))
        // Model document store
        .route("/api/strategy/models", get(routes::models::list_models))
        .route("/api/strategy/models", post(routes::models::save_model))
        .route(
            "/api/strategy/models/{id}",
            get(routes::models::get_model),
        )
        // Company profile
        .route("/api/settings", get(routes::settings::get_settings))
        .route("/api/settings", put(routes::settings::put_settings))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the strategy-modeling API server. Gateway configuration is
/// resolved from the environment once at startup.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(root, GatewayConfig::from_env());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("AIOEP API server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
