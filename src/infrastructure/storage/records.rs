//! Postgres row mappings for orders and shipments

use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};

use super::postgres::{column_error, PgRecord};
use crate::domain::order::{Order, OrderFilter};
use crate::domain::shipment::{Shipment, ShipmentFilter, TrackingEvent};
use crate::domain::DomainError;

impl PgRecord for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static str = "id, status, customer_id, supplier_id, total_cents, currency, item_count, created_at, updated_at";

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(customer_id) = &filter.customer_id {
            builder.push(" AND customer_id = ").push_bind(customer_id.clone());
        }
        if let Some(supplier_id) = &filter.supplier_id {
            builder.push(" AND supplier_id = ").push_bind(supplier_id.clone());
        }
        if let Some(after) = filter.created_after {
            builder.push(" AND created_at >= ").push_bind(after);
        }
        if let Some(before) = filter.created_before {
            builder.push(" AND created_at < ").push_bind(before);
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, DomainError> {
        let decode = |e: sqlx::Error| column_error(Self::TABLE, e);
        let status: String = row.try_get("status").map_err(decode)?;

        Ok(Order {
            id: row.try_get("id").map_err(decode)?,
            status: stored_status(Self::TABLE, &status)?,
            customer_id: row.try_get("customer_id").map_err(decode)?,
            supplier_id: row.try_get("supplier_id").map_err(decode)?,
            total_cents: row.try_get("total_cents").map_err(decode)?,
            currency: row.try_get("currency").map_err(decode)?,
            item_count: row.try_get("item_count").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        })
    }
}

impl PgRecord for Shipment {
    const TABLE: &'static str = "shipments";
    const COLUMNS: &'static str =
        "id, order_id, status, carrier, tracking_number, created_at, updated_at, events";

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ShipmentFilter) {
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(order_id) = &filter.order_id {
            builder.push(" AND order_id = ").push_bind(order_id.clone());
        }
        if let Some(carrier) = &filter.carrier {
            builder.push(" AND carrier = ").push_bind(carrier.clone());
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, DomainError> {
        let decode = |e: sqlx::Error| column_error(Self::TABLE, e);
        let status: String = row.try_get("status").map_err(decode)?;
        let Json(events): Json<Vec<TrackingEvent>> = row.try_get("events").map_err(decode)?;

        Ok(Shipment {
            id: row.try_get("id").map_err(decode)?,
            order_id: row.try_get("order_id").map_err(decode)?,
            status: stored_status(Self::TABLE, &status)?,
            carrier: row.try_get("carrier").map_err(decode)?,
            tracking_number: row.try_get("tracking_number").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
            events,
        })
    }
}

// A status the enum does not know is corrupt data, not a bad request
fn stored_status<T>(table: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(|e: DomainError| {
        DomainError::storage(format!("Invalid status in {} row: {}", table, e))
    })
}
