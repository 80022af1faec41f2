//! Order endpoint handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, OrderListParams, PaginatedResponse, Query};
use crate::domain::{AuthenticatedPartner, Order};

/// GET /v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<PaginatedResponse<Order>>, ApiError> {
    let request = params.into_request()?;
    debug!(partner_id = %partner.partner_id, "Listing orders");

    let page = state.orders.list(request).await?;
    Ok(Json(page.into()))
}

/// GET /v1/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    debug!(partner_id = %partner.partner_id, order_id = %order_id, "Getting order");

    Ok(Json(state.orders.get(&order_id).await?))
}
