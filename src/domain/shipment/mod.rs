//! Shipment domain

mod entity;

pub use entity::{Shipment, ShipmentFilter, ShipmentSortField, ShipmentStatus, TrackingEvent};
