//! Infrastructure services

mod listing_service;

pub use listing_service::{ListRequest, ListingService};
