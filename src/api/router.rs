use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    error_request_id_middleware, logging_middleware, metrics_middleware,
    rate_limit_headers_middleware,
};
use super::state::AppState;
use super::types::ApiError;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
///
/// Layers, outermost first: request id assignment and propagation, tracing,
/// logging, error envelope request ids, then rate-limit headers. Metrics and
/// signature checks run per route, after routing.
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let rate_limit = state.rate_limit.clone();

    let mut router = Router::new()
        // Unauthenticated probes
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Signed partner API
        .merge(v1::create_v1_router(state.clone()))
        .route_layer(middleware::from_fn(metrics_middleware))
        .fallback(route_not_found)
        .with_state(state);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
        .layer(middleware::from_fn_with_state(
            rate_limit,
            rate_limit_headers_middleware,
        ))
        .layer(middleware::from_fn(error_request_id_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("No route matches this request")
}
