//! Deterministic demo dataset for the in-memory backend

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::order::{Order, OrderStatus};
use crate::domain::shipment::{Shipment, ShipmentStatus, TrackingEvent};

pub const DEMO_ORDER_COUNT: usize = 120;

const CARRIERS: [&str; 4] = ["ups", "fedex", "dhl", "usps"];
const CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Orders `ord_0001` to `ord_0120`
///
/// Consecutive pairs share a `created_at` so listings exercise the id tiebreak.
pub fn demo_orders() -> Vec<Order> {
    (1..=DEMO_ORDER_COUNT as i64)
        .map(|i| {
            let created_at = epoch() + Duration::minutes((i / 2) * 53);

            Order {
                id: format!("ord_{:04}", i),
                status: OrderStatus::ALL[(i % 6) as usize],
                customer_id: format!("cus_{:02}", i % 8 + 1),
                supplier_id: format!("sup_{:02}", i % 4 + 1),
                total_cents: 1_000 + (i * 7_919) % 50_000,
                currency: CURRENCIES[(i % 3) as usize].to_string(),
                item_count: (1 + i % 9) as i32,
                created_at,
                updated_at: created_at + Duration::hours((i % 5) * 3),
            }
        })
        .collect()
}

/// One shipment per shipped or delivered order, with its tracking history
pub fn demo_shipments(orders: &[Order]) -> Vec<Shipment> {
    orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Shipped | OrderStatus::Delivered))
        .enumerate()
        .map(|(n, order)| {
            let n = n as i64 + 1;
            let carrier = CARRIERS[(n % 4) as usize];
            let created_at = order.created_at + Duration::hours(2);

            let mut events = vec![
                TrackingEvent {
                    status: ShipmentStatus::LabelCreated,
                    description: "Shipping label created".to_string(),
                    location: None,
                    occurred_at: created_at,
                },
                TrackingEvent {
                    status: ShipmentStatus::InTransit,
                    description: "Departed origin facility".to_string(),
                    location: Some("Memphis, TN".to_string()),
                    occurred_at: created_at + Duration::days(1),
                },
            ];

            if order.status == OrderStatus::Delivered {
                events.push(TrackingEvent {
                    status: ShipmentStatus::OutForDelivery,
                    description: "Out for delivery".to_string(),
                    location: Some("Denver, CO".to_string()),
                    occurred_at: created_at + Duration::days(2),
                });
                events.push(TrackingEvent {
                    status: ShipmentStatus::Delivered,
                    description: "Delivered to front desk".to_string(),
                    location: Some("Denver, CO".to_string()),
                    occurred_at: created_at + Duration::days(2) + Duration::hours(6),
                });
            }

            let last = events.last().map(|e| (e.status, e.occurred_at));
            let (status, updated_at) = last.unwrap_or((ShipmentStatus::LabelCreated, created_at));
            let tracking_number = format!(
                "{}{:012}",
                carrier.to_uppercase(),
                (n * 7_654_321) % 1_000_000_000_000
            );

            Shipment {
                id: format!("shp_{:04}", n),
                order_id: order.id.clone(),
                status,
                carrier: carrier.to_string(),
                tracking_number,
                created_at,
                updated_at,
                events,
            }
        })
        .collect()
}
