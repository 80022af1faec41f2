//! Domain layer - Core business logic and entities

pub mod auth;
pub mod error;
pub mod order;
pub mod pagination;
pub mod partner;
pub mod shipment;
pub mod storage;

pub use auth::{AuthFailure, AuthenticatedPartner, ScopePolicy, SignatureVerifier, SignedRequest};
pub use error::DomainError;
pub use order::{Order, OrderFilter, OrderSortField, OrderStatus};
pub use pagination::{
    clamp_limit, Cursor, CursorCodec, CursorError, Page, PageQuery, PageRecord, SortDirection,
    SortField, SortKind, SortValue,
};
pub use partner::{CredentialLookup, PartnerCredential, PartnerId, PartnerSecret};
pub use shipment::{Shipment, ShipmentFilter, ShipmentSortField, ShipmentStatus, TrackingEvent};
pub use storage::RecordStore;
