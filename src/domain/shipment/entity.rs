//! Shipment entity and tracking events

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pagination::{PageRecord, SortField, SortKind, SortValue};
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    LabelCreated,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 5] = [
        Self::LabelCreated,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Exception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabelCreated => "label_created",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Exception => "exception",
        }
    }
}

impl FromStr for ShipmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown shipment status '{}'", s)))
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A carrier scan attached to a shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub status: ShipmentStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A shipment with its full tracking history, oldest event first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub order_id: String,
    pub status: ShipmentStatus,
    pub carrier: String,
    pub tracking_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub events: Vec<TrackingEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentFilter {
    pub status: Option<ShipmentStatus>,
    pub order_id: Option<String>,
    pub carrier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShipmentSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl FromStr for ShipmentSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(DomainError::validation(format!(
                "Unknown sort field '{}' for shipments. Expected one of: created_at, updated_at",
                other
            ))),
        }
    }
}

impl SortField for ShipmentSortField {
    fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn column(self) -> &'static str {
        self.as_str()
    }

    fn kind(self) -> SortKind {
        SortKind::Timestamp
    }
}

impl PageRecord for Shipment {
    type Filter = ShipmentFilter;
    type SortField = ShipmentSortField;

    const RESOURCE: &'static str = "shipment";

    // Each shipment embeds its tracking history
    const MAX_PAGE_LIMIT: u32 = 20;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_value(&self, field: ShipmentSortField) -> SortValue {
        match field {
            ShipmentSortField::CreatedAt => SortValue::Timestamp(self.created_at),
            ShipmentSortField::UpdatedAt => SortValue::Timestamp(self.updated_at),
        }
    }

    fn matches(&self, filter: &ShipmentFilter) -> bool {
        filter.status.is_none_or(|status| self.status == status)
            && filter
                .order_id
                .as_deref()
                .is_none_or(|id| self.order_id == id)
            && filter
                .carrier
                .as_deref()
                .is_none_or(|carrier| self.carrier == carrier)
    }
}
