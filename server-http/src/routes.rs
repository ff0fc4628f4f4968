use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        // Liveness
        .route("/", get(handlers::health_check))
        .route("/health", get(handlers::health_check))
        // Items
        .route("/random-items/{feed_id}", get(handlers::get_items_uncached))
        .route(
            "/random-items-cached/{feed_id}",
            get(handlers::get_items_cached),
        )
        // Middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router wrapped so `/health/` routes like `/health`.
/// Path normalization has to run before routing, so it sits outside the router.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
