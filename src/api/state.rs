//! Application state shared by handlers and middleware

use std::sync::Arc;

use crate::config::{AuthConfig, RateLimitConfig};
use crate::domain::{CredentialLookup, CursorCodec, Order, ScopePolicy, Shipment, SignatureVerifier};
use crate::infrastructure::services::ListingService;
use crate::infrastructure::storage::Collaborators;

#[derive(Debug, Clone)]
pub struct AppState {
    pub verifier: SignatureVerifier,
    pub scope_policy: Arc<ScopePolicy>,
    pub auth: Arc<AuthConfig>,
    pub rate_limit: RateLimitConfig,
    pub orders: ListingService<Order>,
    pub shipments: ListingService<Shipment>,
    pub credentials: Arc<dyn CredentialLookup>,
}

impl AppState {
    /// Wire the services over a set of collaborators
    ///
    /// Both listings share one cursor codec, so a cursor is only accepted by
    /// a deployment holding the same key.
    pub fn new(
        collaborators: Collaborators,
        codec: CursorCodec,
        auth: AuthConfig,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            verifier: SignatureVerifier::new(Arc::clone(&collaborators.credentials)),
            scope_policy: Arc::new(ScopePolicy::partner_api()),
            auth: Arc::new(auth),
            rate_limit,
            orders: ListingService::new(collaborators.orders, codec.clone()),
            shipments: ListingService::new(collaborators.shipments, codec),
            credentials: collaborators.credentials,
        }
    }
}
