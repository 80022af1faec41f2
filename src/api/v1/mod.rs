//! Partner v1 endpoints
//!
//! Every route here sits behind the signature middleware.

pub mod orders;
pub mod shipments;

use axum::{middleware, routing::get, Router};

use super::middleware::signature_middleware;
use super::state::AppState;

/// Routes carry their full paths rather than being nested, so the middleware
/// sees the same path the partner signed.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(orders::list_orders))
        .route("/v1/orders/{order_id}", get(orders::get_order))
        .route("/v1/shipments", get(shipments::list_shipments))
        .route("/v1/shipments/{shipment_id}", get(shipments::get_shipment))
        .route_layer(middleware::from_fn_with_state(state, signature_middleware))
}
