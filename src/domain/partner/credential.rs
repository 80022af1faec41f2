//! Partner credential entity and related types

use std::collections::BTreeSet;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted length of a partner secret in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

const MAX_KEY_ID_LENGTH: usize = 128;

/// Errors raised when a credential record does not meet the provisioning rules
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API key identifier cannot be empty")]
    EmptyKeyId,

    #[error("API key identifier exceeds maximum length of {0} characters")]
    KeyIdTooLong(usize),

    #[error("API key identifier contains invalid character: '{0}'")]
    InvalidKeyIdCharacter(char),

    #[error("Partner identifier cannot be empty")]
    EmptyPartnerId,

    #[error("Partner secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Invalid IP allowlist entry: '{0}'")]
    InvalidIpAddress(String),
}

/// Identifier of the partner organisation that owns a credential
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(String);

impl PartnerId {
    pub fn new(id: impl Into<String>) -> Result<Self, CredentialError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(CredentialError::EmptyPartnerId);
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared HMAC secret. Never printed, serialized, or compared outside the verifier.
#[derive(Clone)]
pub struct PartnerSecret(Vec<u8>);

impl PartnerSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CredentialError> {
        let bytes = bytes.into();

        if bytes.len() < MIN_SECRET_LENGTH {
            return Err(CredentialError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
                actual: bytes.len(),
            });
        }

        Ok(Self(bytes))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for PartnerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PartnerSecret([REDACTED])")
    }
}

/// Validate a public API key identifier such as `pk_live_3f9a...`
///
/// Rules:
/// - Cannot be empty
/// - Maximum 128 characters
/// - Only ASCII alphanumerics, `_` and `-`
pub fn validate_key_id(key_id: &str) -> Result<(), CredentialError> {
    if key_id.is_empty() {
        return Err(CredentialError::EmptyKeyId);
    }

    if key_id.len() > MAX_KEY_ID_LENGTH {
        return Err(CredentialError::KeyIdTooLong(MAX_KEY_ID_LENGTH));
    }

    if let Some(c) = key_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(CredentialError::InvalidKeyIdCharacter(c));
    }

    Ok(())
}

/// A partner's API credential as provisioned out-of-band
#[derive(Debug, Clone)]
pub struct PartnerCredential {
    key_id: String,
    partner_id: PartnerId,
    secret: PartnerSecret,
    scopes: BTreeSet<String>,
    ip_allowlist: Vec<IpAddr>,
    active: bool,
}

impl PartnerCredential {
    /// Create an active credential with no scopes and no IP restriction
    pub fn new(
        key_id: impl Into<String>,
        partner_id: PartnerId,
        secret: PartnerSecret,
    ) -> Result<Self, CredentialError> {
        let key_id = key_id.into();
        validate_key_id(&key_id)?;

        Ok(Self {
            key_id,
            partner_id,
            secret,
            scopes: BTreeSet::new(),
            ip_allowlist: Vec::new(),
            active: true,
        })
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ip_allowlist(mut self, addresses: impl IntoIterator<Item = IpAddr>) -> Self {
        self.ip_allowlist = addresses.into_iter().collect();
        self
    }

    /// Parse allowlist entries from their textual form
    pub fn with_ip_allowlist_strs<S: AsRef<str>>(
        self,
        entries: &[S],
    ) -> Result<Self, CredentialError> {
        let addresses = entries
            .iter()
            .map(|entry| {
                let entry = entry.as_ref().trim();
                entry
                    .parse::<IpAddr>()
                    .map_err(|_| CredentialError::InvalidIpAddress(entry.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.with_ip_allowlist(addresses))
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn partner_id(&self) -> &PartnerId {
        &self.partner_id
    }

    pub fn secret(&self) -> &PartnerSecret {
        &self.secret
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    pub fn ip_allowlist(&self) -> &[IpAddr] {
        &self.ip_allowlist
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// An empty allowlist admits any caller; otherwise the address must be known and listed
    pub fn allows_ip(&self, addr: Option<IpAddr>) -> bool {
        if self.ip_allowlist.is_empty() {
            return true;
        }

        match addr {
            Some(addr) => self
                .ip_allowlist
                .iter()
                .any(|allowed| *allowed == addr || *allowed == canonical(addr)),
            None => false,
        }
    }
}

/// Map IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) back to IPv4
fn canonical(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> PartnerSecret {
        PartnerSecret::new("s".repeat(MIN_SECRET_LENGTH)).unwrap()
    }

    fn credential() -> PartnerCredential {
        PartnerCredential::new("pk_test_abc", PartnerId::new("acme").unwrap(), secret()).unwrap()
    }

    #[test]
    fn test_secret_below_floor_rejected() {
        let err = PartnerSecret::new("short").unwrap_err();
        assert_eq!(
            err,
            CredentialError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
                actual: 5
            }
        );
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = PartnerSecret::new("super-secret-value-that-is-long-enough").unwrap();
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("REDACTED"));

        let printed = format!("{:?}", credential());
        assert!(!printed.contains("ssssssss"));
    }

    #[test]
    fn test_validate_key_id() {
        assert!(validate_key_id("pk_live_3f9a-01").is_ok());
        assert_eq!(validate_key_id(""), Err(CredentialError::EmptyKeyId));
        assert_eq!(
            validate_key_id("pk live"),
            Err(CredentialError::InvalidKeyIdCharacter(' '))
        );
        assert_eq!(
            validate_key_id(&"a".repeat(129)),
            Err(CredentialError::KeyIdTooLong(128))
        );
    }

    #[test]
    fn test_empty_partner_id_rejected() {
        assert_eq!(PartnerId::new("  "), Err(CredentialError::EmptyPartnerId));
    }

    #[test]
    fn test_empty_allowlist_admits_everyone() {
        let credential = credential();
        assert!(credential.allows_ip(None));
        assert!(credential.allows_ip(Some("203.0.113.7".parse().unwrap())));
    }

    #[test]
    fn test_allowlist_membership() {
        let credential = credential()
            .with_ip_allowlist_strs(&["203.0.113.7", "2001:db8::1"])
            .unwrap();

        assert!(credential.allows_ip(Some("203.0.113.7".parse().unwrap())));
        assert!(credential.allows_ip(Some("::ffff:203.0.113.7".parse().unwrap())));
        assert!(credential.allows_ip(Some("2001:db8::1".parse().unwrap())));
        assert!(!credential.allows_ip(Some("203.0.113.8".parse().unwrap())));
        assert!(!credential.allows_ip(None));
    }

    #[test]
    fn test_invalid_allowlist_entry() {
        let err = credential().with_ip_allowlist_strs(&["10.0.0.300"]).unwrap_err();
        assert_eq!(err, CredentialError::InvalidIpAddress("10.0.0.300".to_string()));
    }

    #[test]
    fn test_builder_sets_scopes_and_status() {
        let credential = credential()
            .with_scopes(["orders:read", "shipments:read"])
            .with_active(false);

        assert!(credential.scopes().contains("orders:read"));
        assert_eq!(credential.scopes().len(), 2);
        assert!(!credential.is_active());
    }
}
