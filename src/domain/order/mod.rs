//! Order domain

mod entity;

pub use entity::{Order, OrderFilter, OrderSortField, OrderStatus};
