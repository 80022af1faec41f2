//! Credential lookup capability

use async_trait::async_trait;
use std::fmt::Debug;

use super::credential::PartnerCredential;
use crate::domain::DomainError;

/// Read-only capability to resolve a public key identifier to its credential
///
/// Implementations must not filter out inactive credentials; the verifier
/// needs to see them to keep unknown and deactivated keys indistinguishable.
#[async_trait]
pub trait CredentialLookup: Send + Sync + Debug {
    /// Resolve a key identifier, returning `None` when it was never issued
    async fn find(&self, key_id: &str) -> Result<Option<PartnerCredential>, DomainError>;

    /// Verify the backing source is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock credential lookup that counts calls and can be told to fail
    #[derive(Debug, Default)]
    pub struct MockCredentialLookup {
        credentials: HashMap<String, PartnerCredential>,
        lookups: AtomicUsize,
        should_fail: AtomicBool,
    }

    impl MockCredentialLookup {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_credential(mut self, credential: PartnerCredential) -> Self {
            self.credentials
                .insert(credential.key_id().to_string(), credential);
            self
        }

        pub fn set_should_fail(&self, fail: bool) {
            self.should_fail.store(fail, Ordering::SeqCst);
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialLookup for MockCredentialLookup {
        async fn find(&self, key_id: &str) -> Result<Option<PartnerCredential>, DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);

            if self.should_fail.load(Ordering::SeqCst) {
                return Err(DomainError::storage("Mock lookup configured to fail"));
            }

            Ok(self.credentials.get(key_id).cloned())
        }
    }
}
