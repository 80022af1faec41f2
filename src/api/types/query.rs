//! Query string extraction for list endpoints

use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};

use super::error::ApiError;
use crate::domain::{DomainError, OrderFilter, OrderSortField, ShipmentFilter, ShipmentSortField};
use crate::infrastructure::services::ListRequest;

/// Query extractor whose rejections use the API error envelope
#[derive(Debug, Clone, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(ApiError::bad_request(format!(
                "Invalid query string: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Parameters shared by every list endpoint
///
/// Values arrive as raw strings so that parse failures carry our own messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListParams {
    #[serde(flatten)]
    pub page: PageParams,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentListParams {
    #[serde(flatten)]
    pub page: PageParams,
    pub status: Option<String>,
    pub order_id: Option<String>,
    pub carrier: Option<String>,
}

impl PageParams {
    fn into_request<F, S>(self, filter: F) -> Result<ListRequest<F, S>, DomainError>
    where
        S: FromStr<Err = DomainError>,
    {
        Ok(ListRequest {
            filter,
            sort: parse_opt(self.sort.as_deref())?,
            direction: parse_opt(self.order.as_deref())?.unwrap_or_default(),
            cursor: self.cursor,
            limit: parse_limit(self.limit.as_deref())?,
        })
    }
}

impl OrderListParams {
    pub fn into_request(self) -> Result<ListRequest<OrderFilter, OrderSortField>, DomainError> {
        let filter = OrderFilter {
            status: parse_opt(self.status.as_deref())?,
            customer_id: self.customer_id,
            supplier_id: self.supplier_id,
            created_after: parse_timestamp("created_after", self.created_after.as_deref())?,
            created_before: parse_timestamp("created_before", self.created_before.as_deref())?,
        };
        self.page.into_request(filter)
    }
}

impl ShipmentListParams {
    pub fn into_request(
        self,
    ) -> Result<ListRequest<ShipmentFilter, ShipmentSortField>, DomainError> {
        let filter = ShipmentFilter {
            status: parse_opt(self.status.as_deref())?,
            order_id: self.order_id,
            carrier: self.carrier,
        };
        self.page.into_request(filter)
    }
}

fn parse_opt<T>(raw: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    raw.map(str::parse).transpose()
}

/// Parse `limit`; digits-only values that overflow saturate and are clamped later
fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, DomainError> {
    match raw {
        None => Ok(None),
        Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(Some(v.parse::<u32>().unwrap_or(u32::MAX)))
        }
        Some(v) => Err(DomainError::validation(format!(
            "Invalid limit '{}'. Expected a non-negative integer",
            v
        ))),
    }
}

fn parse_timestamp(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    raw.map(|v| {
        DateTime::parse_from_rfc3339(v)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                DomainError::validation(format!(
                    "Invalid {} '{}'. Expected an RFC 3339 timestamp",
                    name, v
                ))
            })
    })
    .transpose()
}
