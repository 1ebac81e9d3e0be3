// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::post,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers::submission, state::AppState};

/// Assembles the main application router.
///
/// * Single submission endpoint serving both form kinds.
/// * Applies global middleware (Trace, CORS from the configured
///   allow-list).
/// * Injects global state (store, rate limiter, notifier, config).
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.allowed_origins);

    Router::new()
        .route(
            "/api/submissions",
            post(submission::submit).get(submission::info),
        )
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// A `*` entry opens the endpoint to any origin; reserve that for
/// development deployments.
fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
