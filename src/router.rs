use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

/// Builds the complete application: fixed route table plus global layers.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api-docs", get(public::openapi_get))
        .merge(auth_routes())
        .merge(catalog_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .nest_service("/assets", ServeDir::new(&config.server.assets_dir))
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(public::login_post))
        .route("/api/register", post(public::register_post))
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pokemons", get(public::pokemon_list))
        .route("/api/pokemons/:id", get(public::pokemon_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/pokemons", post(protected::pokemon_post))
        .route(
            "/api/pokemons/:id",
            axum::routing::put(protected::pokemon_put).delete(protected::pokemon_delete),
        )
        .route("/api/pokemons/:id/favorite", patch(protected::pokemon_favorite))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
