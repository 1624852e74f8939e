pub mod dashboard_routes;
pub mod settlement_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_layer_for;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer_for(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/settlements", settlement_routes::create_settlement_router())
        .nest("/api/dashboard", dashboard_routes::create_dashboard_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

/// Endpoint de salud simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "driver-settlement",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
