// handlers/public/service.rs - banner and liveness

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Pokédex API",
        "version": version,
        "store": state.store.backend(),
        "endpoints": {
            "pokemons": "/api/pokemons[/:id] (GET public; POST, PUT, DELETE, PATCH /favorite require a bearer token)",
            "auth": "/api/login, /api/register (public)",
            "docs": "/api-docs (public)",
            "assets": "/assets/* (public)",
            "health": "/health (public)"
        }
    }))
}

/// GET /health - pings the store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
