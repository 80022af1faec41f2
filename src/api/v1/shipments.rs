//! Shipment endpoint handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, PaginatedResponse, Query, ShipmentListParams};
use crate::domain::{AuthenticatedPartner, Shipment};

/// GET /v1/shipments
pub async fn list_shipments(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Query(params): Query<ShipmentListParams>,
) -> Result<Json<PaginatedResponse<Shipment>>, ApiError> {
    let request = params.into_request()?;
    debug!(partner_id = %partner.partner_id, "Listing shipments");

    let page = state.shipments.list(request).await?;
    Ok(Json(page.into()))
}

/// GET /v1/shipments/{shipment_id}
pub async fn get_shipment(
    State(state): State<AppState>,
    Extension(partner): Extension<AuthenticatedPartner>,
    Path(shipment_id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    debug!(partner_id = %partner.partner_id, shipment_id = %shipment_id, "Getting shipment");

    Ok(Json(state.shipments.get(&shipment_id).await?))
}
