//! HMAC request signature verifier

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::error::AuthFailure;
use super::signature::{compute_signature, digests_match, SignatureHeader};
use crate::domain::partner::{CredentialLookup, PartnerId};
use crate::domain::DomainError;

/// Maximum allowed distance in seconds between the declared timestamp and now
pub const REPLAY_WINDOW_SECS: u64 = 300;

// Stand-in key for unknown or inactive credentials so that rejection costs a full HMAC
const UNKNOWN_KEY_SECRET: [u8; 32] = [0x5a; 32];

/// The parts of an inbound request covered by the signature
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    pub key_id: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub method: &'a str,
    pub path: &'a str,
    pub body: &'a [u8],
    pub client_addr: Option<IpAddr>,
}

/// Identity attached to a request once its signature has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPartner {
    pub partner_id: PartnerId,
    pub key_id: String,
    pub scopes: BTreeSet<String>,
}

/// Verification outcome other than success
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("request rejected: {0}")]
    Rejected(#[from] AuthFailure),

    #[error("credential lookup failed: {0}")]
    Lookup(DomainError),
}

/// Verifies signed requests against credentials from an injected lookup
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    credentials: Arc<dyn CredentialLookup>,
}

impl SignatureVerifier {
    pub fn new(credentials: Arc<dyn CredentialLookup>) -> Self {
        Self { credentials }
    }

    /// Verify a request at `now` (unix seconds)
    ///
    /// Checks run in a fixed order: header presence, header grammar, replay
    /// window, then a credential lookup and a full HMAC whether or not the
    /// key resolved. An unknown or inactive key is only reported after the
    /// digest comparison has run.
    pub async fn verify(
        &self,
        request: &SignedRequest<'_>,
        now: i64,
    ) -> Result<AuthenticatedPartner, VerifyError> {
        let key_id = request
            .key_id
            .filter(|k| !k.is_empty())
            .ok_or(AuthFailure::MissingKey)?;

        let header: SignatureHeader = request
            .signature
            .filter(|s| !s.is_empty())
            .ok_or(AuthFailure::MissingSignature)?
            .parse()?;

        if now.abs_diff(header.timestamp) > REPLAY_WINDOW_SECS {
            return Err(AuthFailure::StaleTimestamp.into());
        }

        let credential = self
            .credentials
            .find(key_id)
            .await
            .map_err(VerifyError::Lookup)?
            .filter(|c| c.is_active());

        let secret = credential
            .as_ref()
            .map(|c| c.secret().expose())
            .unwrap_or(&UNKNOWN_KEY_SECRET[..]);

        let expected = compute_signature(
            secret,
            header.timestamp,
            request.method,
            request.path,
            request.body,
        );
        let signature_valid = digests_match(&expected, &header.digest);

        let credential = credential.ok_or(AuthFailure::UnknownKey)?;

        if !signature_valid {
            return Err(AuthFailure::BadSignature.into());
        }

        if !credential.allows_ip(request.client_addr) {
            return Err(AuthFailure::IpDenied.into());
        }

        debug!(
            partner_id = %credential.partner_id(),
            key_id = %credential.key_id(),
            "Request signature verified"
        );

        Ok(AuthenticatedPartner {
            partner_id: credential.partner_id().clone(),
            key_id: credential.key_id().to_string(),
            scopes: credential.scopes().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::partner::mock::MockCredentialLookup;
    use crate::domain::partner::{PartnerCredential, PartnerSecret};

    const KEY_ID: &str = "pk_test_acme";
    const SECRET: &[u8] = b"acme-shared-secret-0123456789abcdef";
    const NOW: i64 = 1_700_000_000;

    fn credential() -> PartnerCredential {
        PartnerCredential::new(
            KEY_ID,
            PartnerId::new("acme").unwrap(),
            PartnerSecret::new(SECRET).unwrap(),
        )
        .unwrap()
        .with_scopes(["orders:read"])
    }

    fn verifier_with(lookup: MockCredentialLookup) -> (SignatureVerifier, Arc<MockCredentialLookup>) {
        let lookup = Arc::new(lookup);
        (SignatureVerifier::new(lookup.clone()), lookup)
    }

    fn verifier() -> SignatureVerifier {
        verifier_with(MockCredentialLookup::new().with_credential(credential())).0
    }

    fn sign(secret: &[u8], timestamp: i64, method: &str, path: &str, body: &[u8]) -> String {
        SignatureHeader::sign(secret, timestamp, method, path, body).to_string()
    }

    fn request<'a>(signature: &'a str, body: &'a [u8]) -> SignedRequest<'a> {
        SignedRequest {
            key_id: Some(KEY_ID),
            signature: Some(signature),
            method: "POST",
            path: "/v1/orders",
            body,
            client_addr: None,
        }
    }

    fn rejection(result: Result<AuthenticatedPartner, VerifyError>) -> AuthFailure {
        match result {
            Err(VerifyError::Rejected(failure)) => failure,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_request_is_accepted() {
        let body = br#"{"status":"pending"}"#;
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", body);

        let partner = verifier().verify(&request(&signature, body), NOW).await.unwrap();

        assert_eq!(partner.partner_id.as_str(), "acme");
        assert_eq!(partner.key_id, KEY_ID);
        assert!(partner.scopes.contains("orders:read"));
    }

    #[tokio::test]
    async fn test_verification_is_deterministic() {
        let verifier = verifier();
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"x");

        for _ in 0..3 {
            assert!(verifier.verify(&request(&signature, b"x"), NOW).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_replay_window_boundary() {
        let verifier = verifier();

        for (timestamp, accepted) in [
            (NOW - 300, true),
            (NOW + 300, true),
            (NOW - 301, false),
            (NOW + 301, false),
        ] {
            let signature = sign(SECRET, timestamp, "POST", "/v1/orders", b"");
            let result = verifier.verify(&request(&signature, b""), NOW).await;

            if accepted {
                assert!(result.is_ok(), "timestamp offset {} rejected", timestamp - NOW);
            } else {
                assert_eq!(rejection(result), AuthFailure::StaleTimestamp);
            }
        }
    }

    #[tokio::test]
    async fn test_stale_request_rejected_before_lookup() {
        let (verifier, lookup) =
            verifier_with(MockCredentialLookup::new().with_credential(credential()));
        let signature = sign(SECRET, NOW - 3600, "POST", "/v1/orders", b"");

        let result = verifier.verify(&request(&signature, b""), NOW).await;

        assert_eq!(rejection(result), AuthFailure::StaleTimestamp);
        assert_eq!(lookup.lookups(), 0);
    }

    #[tokio::test]
    async fn test_any_single_bit_flip_in_body_is_rejected() {
        let verifier = verifier();
        let body = br#"{"id":"ord_1"}"#.to_vec();
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", &body);

        for byte in 0..body.len() {
            for bit in 0..8 {
                let mut mutated = body.clone();
                mutated[byte] ^= 1 << bit;

                let result = verifier.verify(&request(&signature, &mutated), NOW).await;
                assert_eq!(rejection(result), AuthFailure::BadSignature);
            }
        }
    }

    #[tokio::test]
    async fn test_path_is_case_sensitive() {
        let signature = sign(SECRET, NOW, "POST", "/v1/Orders", b"");
        let result = verifier().verify(&request(&signature, b""), NOW).await;
        assert_eq!(rejection(result), AuthFailure::BadSignature);
    }

    #[tokio::test]
    async fn test_missing_headers() {
        let verifier = verifier();
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"");

        let mut no_key = request(&signature, b"");
        no_key.key_id = None;
        assert_eq!(rejection(verifier.verify(&no_key, NOW).await), AuthFailure::MissingKey);

        let mut empty_key = request(&signature, b"");
        empty_key.key_id = Some("");
        assert_eq!(rejection(verifier.verify(&empty_key, NOW).await), AuthFailure::MissingKey);

        let mut no_signature = request(&signature, b"");
        no_signature.signature = None;
        assert_eq!(
            rejection(verifier.verify(&no_signature, NOW).await),
            AuthFailure::MissingSignature
        );
    }

    #[tokio::test]
    async fn test_malformed_signature() {
        let result = verifier()
            .verify(&request("t=1700000000;s=abc", b""), NOW)
            .await;
        assert_eq!(rejection(result), AuthFailure::MalformedSignature);
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let verifier = verifier();
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"");
        let mut unknown = request(&signature, b"");
        unknown.key_id = Some("pk_test_nobody");

        assert_eq!(rejection(verifier.verify(&unknown, NOW).await), AuthFailure::UnknownKey);
    }

    #[tokio::test]
    async fn test_inactive_key_reported_as_unknown() {
        let (verifier, _) = verifier_with(
            MockCredentialLookup::new().with_credential(credential().with_active(false)),
        );
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"");

        let result = verifier.verify(&request(&signature, b""), NOW).await;
        assert_eq!(rejection(result), AuthFailure::UnknownKey);
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let signature = sign(b"not-the-partner-secret-0123456789", NOW, "POST", "/v1/orders", b"");
        let result = verifier().verify(&request(&signature, b""), NOW).await;
        assert_eq!(rejection(result), AuthFailure::BadSignature);
    }

    #[tokio::test]
    async fn test_signature_made_with_dummy_secret_is_still_unknown_key() {
        let verifier = verifier();
        let signature = sign(&UNKNOWN_KEY_SECRET, NOW, "POST", "/v1/orders", b"");
        let mut unknown = request(&signature, b"");
        unknown.key_id = Some("pk_test_nobody");

        assert_eq!(rejection(verifier.verify(&unknown, NOW).await), AuthFailure::UnknownKey);
    }

    #[tokio::test]
    async fn test_ip_allowlist() {
        let allowlisted = credential().with_ip_allowlist(["198.51.100.4".parse().unwrap()]);
        let (verifier, _) =
            verifier_with(MockCredentialLookup::new().with_credential(allowlisted));
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"");

        let mut allowed = request(&signature, b"");
        allowed.client_addr = Some("198.51.100.4".parse().unwrap());
        assert!(verifier.verify(&allowed, NOW).await.is_ok());

        let mut denied = request(&signature, b"");
        denied.client_addr = Some("198.51.100.5".parse().unwrap());
        assert_eq!(rejection(verifier.verify(&denied, NOW).await), AuthFailure::IpDenied);

        let unknown_addr = request(&signature, b"");
        assert_eq!(
            rejection(verifier.verify(&unknown_addr, NOW).await),
            AuthFailure::IpDenied
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_an_auth_failure() {
        let (verifier, lookup) =
            verifier_with(MockCredentialLookup::new().with_credential(credential()));
        lookup.set_should_fail(true);
        let signature = sign(SECRET, NOW, "POST", "/v1/orders", b"");

        let result = verifier.verify(&request(&signature, b""), NOW).await;
        assert!(matches!(result, Err(VerifyError::Lookup(DomainError::Storage { .. }))));
    }
}
