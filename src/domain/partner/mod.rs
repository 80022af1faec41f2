//! Partner domain
//!
//! Credentials issued to partners and the lookup capability the request
//! verifier depends on.

mod credential;
mod repository;

pub use credential::{
    validate_key_id, CredentialError, PartnerCredential, PartnerId, PartnerSecret,
    MIN_SECRET_LENGTH,
};
pub use repository::CredentialLookup;

#[cfg(test)]
pub use repository::mock;
