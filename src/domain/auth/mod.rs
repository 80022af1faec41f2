//! Request authentication domain
//!
//! Signature header grammar, the HMAC verifier, failure reasons, and the
//! route scope policy applied after a request is authenticated.

mod error;
mod scope;
mod signature;
mod verifier;

pub use error::AuthFailure;
pub use scope::{ScopePolicy, ORDERS_READ, SHIPMENTS_READ};
pub use signature::{compute_signature, digests_match, SignatureHeader, DIGEST_LENGTH};
pub use verifier::{
    AuthenticatedPartner, SignatureVerifier, SignedRequest, VerifyError, REPLAY_WINDOW_SECS,
};
