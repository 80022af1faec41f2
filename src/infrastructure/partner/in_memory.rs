//! Credential lookup backed by a fixed set loaded at startup

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::PartnerConfig;
use crate::domain::partner::{CredentialLookup, PartnerCredential};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: HashMap<String, PartnerCredential>,
}

impl InMemoryCredentialStore {
    /// Build from the configured `[[partners]]` list
    ///
    /// Rejects invalid entries and duplicate key ids.
    pub fn from_config(partners: &[PartnerConfig]) -> Result<Self, DomainError> {
        let mut credentials = HashMap::with_capacity(partners.len());

        for partner in partners {
            let credential = partner.to_credential().map_err(|e| {
                DomainError::configuration(format!(
                    "Invalid partner credential '{}': {}",
                    partner.key_id, e
                ))
            })?;

            if credentials
                .insert(credential.key_id().to_string(), credential)
                .is_some()
            {
                return Err(DomainError::configuration(format!(
                    "Duplicate partner key id '{}'",
                    partner.key_id
                )));
            }
        }

        Ok(Self { credentials })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl CredentialLookup for InMemoryCredentialStore {
    async fn find(&self, key_id: &str) -> Result<Option<PartnerCredential>, DomainError> {
        Ok(self.credentials.get(key_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn partner(key_id: &str, active: bool) -> PartnerConfig {
        PartnerConfig {
            key_id: key_id.to_string(),
            partner_id: "acme".to_string(),
            secret: SECRET.to_string(),
            scopes: vec!["orders:read".to_string()],
            ip_allowlist: vec![],
            active,
        }
    }

    #[tokio::test]
    async fn test_from_config_keeps_inactive_credentials() {
        let store =
            InMemoryCredentialStore::from_config(&[partner("pk_live", true), partner("pk_old", false)])
                .unwrap();

        assert_eq!(store.len(), 2);

        let old = store.find("pk_old").await.unwrap().unwrap();
        assert!(!old.is_active());
        assert!(store.find("pk_missing").await.unwrap().is_none());
    }

    #[test]
    fn test_duplicate_key_ids_are_rejected() {
        let result =
            InMemoryCredentialStore::from_config(&[partner("pk_live", true), partner("pk_live", true)]);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_entry_names_the_key_without_the_secret() {
        let mut bad = partner("pk_bad", true);
        bad.ip_allowlist = vec!["not-an-ip".to_string()];

        let err = InMemoryCredentialStore::from_config(&[bad]).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("pk_bad"));
        assert!(!message.contains(SECRET));
    }
}
