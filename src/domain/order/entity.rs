//! Order entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pagination::{PageRecord, SortField, SortKind, SortValue};
use crate::domain::DomainError;

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown order status '{}'", s)))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order as exposed to partners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub customer_id: String,
    pub supplier_id: String,
    pub total_cents: i64,
    pub currency: String,
    pub item_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order listing filters; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    pub supplier_id: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    TotalCents,
}

impl FromStr for OrderSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "total_cents" => Ok(Self::TotalCents),
            other => Err(DomainError::validation(format!(
                "Unknown sort field '{}' for orders. Expected one of: created_at, updated_at, total_cents",
                other
            ))),
        }
    }
}

impl SortField for OrderSortField {
    fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::TotalCents => "total_cents",
        }
    }

    fn column(self) -> &'static str {
        self.as_str()
    }

    fn kind(self) -> SortKind {
        match self {
            Self::CreatedAt | Self::UpdatedAt => SortKind::Timestamp,
            Self::TotalCents => SortKind::Integer,
        }
    }
}

impl PageRecord for Order {
    type Filter = OrderFilter;
    type SortField = OrderSortField;

    const RESOURCE: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_value(&self, field: OrderSortField) -> SortValue {
        match field {
            OrderSortField::CreatedAt => SortValue::Timestamp(self.created_at),
            OrderSortField::UpdatedAt => SortValue::Timestamp(self.updated_at),
            OrderSortField::TotalCents => SortValue::Integer(self.total_cents),
        }
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.status.is_none_or(|status| self.status == status)
            && filter
                .customer_id
                .as_deref()
                .is_none_or(|id| self.customer_id == id)
            && filter
                .supplier_id
                .as_deref()
                .is_none_or(|id| self.supplier_id == id)
            && filter.created_after.is_none_or(|after| self.created_at >= after)
            && filter
                .created_before
                .is_none_or(|before| self.created_at < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order() -> Order {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Order {
            id: "ord_0001".to_string(),
            status: OrderStatus::Shipped,
            customer_id: "cus_01".to_string(),
            supplier_id: "sup_01".to_string(),
            total_cents: 12_500,
            currency: "USD".to_string(),
            item_count: 3,
            created_at: created,
            updated_at: created + chrono::Duration::hours(6),
        }
    }

    #[test]
    fn test_status_parsing() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(
            "total_cents".parse::<OrderSortField>().unwrap(),
            OrderSortField::TotalCents
        );
        assert!("id".parse::<OrderSortField>().is_err());
        assert_eq!(OrderSortField::default(), OrderSortField::CreatedAt);
        assert_eq!(OrderSortField::TotalCents.kind(), SortKind::Integer);
    }

    #[test]
    fn test_sort_value() {
        let order = order();
        assert_eq!(
            order.sort_value(OrderSortField::UpdatedAt),
            SortValue::Timestamp(order.updated_at)
        );
        assert_eq!(
            order.sort_value(OrderSortField::TotalCents),
            SortValue::Integer(12_500)
        );
    }

    #[test]
    fn test_filter_matching() {
        let order = order();
        assert!(order.matches(&OrderFilter::default()));

        let by_status = OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        };
        assert!(!order.matches(&by_status));

        let by_customer = OrderFilter {
            customer_id: Some("cus_01".to_string()),
            supplier_id: Some("sup_01".to_string()),
            ..Default::default()
        };
        assert!(order.matches(&by_customer));
    }

    #[test]
    fn test_created_range_bounds() {
        let order = order();

        let inclusive_start = OrderFilter {
            created_after: Some(order.created_at),
            ..Default::default()
        };
        assert!(order.matches(&inclusive_start));

        let exclusive_end = OrderFilter {
            created_before: Some(order.created_at),
            ..Default::default()
        };
        assert!(!order.matches(&exclusive_end));
    }
}
