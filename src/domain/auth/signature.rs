//! Request signature header grammar and HMAC computation
//!
//! A signature header has exactly the form `t=<unix-seconds>,s=<hex>`. `t` is
//! canonical decimal with no leading zeros, and the hex part is the lowercase
//! HMAC-SHA256 of `"{t}\n{METHOD}\n{path}\n{raw body}"` keyed by the partner
//! secret.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::AuthFailure;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 digest in bytes
pub const DIGEST_LENGTH: usize = 32;

const TIMESTAMP_PREFIX: &str = "t=";
const SIGNATURE_PREFIX: &str = "s=";
// i64::MAX has 19 digits
const MAX_TIMESTAMP_DIGITS: usize = 19;

/// A parsed signature header
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub digest: [u8; DIGEST_LENGTH],
}

impl SignatureHeader {
    /// Sign a request and return the header it should carry
    pub fn sign(
        secret: &[u8],
        timestamp: i64,
        method: &str,
        path: &str,
        body: &[u8],
    ) -> Self {
        Self {
            timestamp,
            digest: compute_signature(secret, timestamp, method, path, body),
        }
    }
}

impl fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{},{}{}",
            TIMESTAMP_PREFIX,
            self.timestamp,
            SIGNATURE_PREFIX,
            hex::encode(self.digest)
        )
    }
}

impl fmt::Debug for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureHeader")
            .field("timestamp", &self.timestamp)
            .field("digest", &"[REDACTED]")
            .finish()
    }
}

impl FromStr for SignatureHeader {
    type Err = AuthFailure;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (timestamp_field, signature_field) = value
            .split_once(',')
            .ok_or(AuthFailure::MalformedSignature)?;

        let timestamp = timestamp_field
            .strip_prefix(TIMESTAMP_PREFIX)
            .ok_or(AuthFailure::MalformedSignature)
            .and_then(parse_timestamp)?;

        let digest = signature_field
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or(AuthFailure::MalformedSignature)
            .and_then(parse_digest)?;

        Ok(Self { timestamp, digest })
    }
}

fn parse_timestamp(digits: &str) -> Result<i64, AuthFailure> {
    if digits.is_empty()
        || digits.len() > MAX_TIMESTAMP_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
        // One spelling per instant, so the signed text is always `timestamp.to_string()`
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return Err(AuthFailure::MalformedSignature);
    }

    digits.parse().map_err(|_| AuthFailure::MalformedSignature)
}

fn parse_digest(hex_digest: &str) -> Result<[u8; DIGEST_LENGTH], AuthFailure> {
    // A trailing third field ends up here and fails the charset check
    if hex_digest.len() != DIGEST_LENGTH * 2
        || !hex_digest
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Err(AuthFailure::MalformedSignature);
    }

    let mut digest = [0u8; DIGEST_LENGTH];
    hex::decode_to_slice(hex_digest, &mut digest).map_err(|_| AuthFailure::MalformedSignature)?;

    Ok(digest)
}

/// HMAC-SHA256 over `"{timestamp}\n{method}\n{path}\n{body}"`
///
/// The message is fed incrementally so the body is never copied.
pub fn compute_signature(
    secret: &[u8],
    timestamp: i64,
    method: &str,
    path: &str,
    body: &[u8],
) -> [u8; DIGEST_LENGTH] {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b"\n");
    mac.update(method.as_bytes());
    mac.update(b"\n");
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(body);

    let mut digest = [0u8; DIGEST_LENGTH];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Constant-time comparison of two fixed-length digests
pub fn digests_match(expected: &[u8; DIGEST_LENGTH], provided: &[u8; DIGEST_LENGTH]) -> bool {
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn valid_header() -> String {
        SignatureHeader::sign(SECRET, 1_700_000_000, "GET", "/v1/orders", b"").to_string()
    }

    #[test]
    fn test_parse_valid_header() {
        let header: SignatureHeader = valid_header().parse().unwrap();
        assert_eq!(header.timestamp, 1_700_000_000);
        assert_eq!(
            header.digest,
            compute_signature(SECRET, 1_700_000_000, "GET", "/v1/orders", b"")
        );
    }

    #[test]
    fn test_display_format() {
        let header = valid_header();
        assert!(header.starts_with("t=1700000000,s="));
        assert_eq!(header.len(), "t=1700000000,s=".len() + 64);
    }

    #[test]
    fn test_rejects_deviations_from_grammar() {
        let digest = "a".repeat(64);
        let cases = [
            String::new(),
            "t=1700000000".to_string(),
            format!("s={},t=1700000000", digest),
            format!("t=1700000000, s={}", digest),
            format!(" t=1700000000,s={}", digest),
            format!("t=1700000000,s={},v=1", digest),
            format!("t=1700000000,s={},", digest),
            format!("T=1700000000,s={}", digest),
            format!("t=,s={}", digest),
            format!("t=-5,s={}", digest),
            format!("t=+5,s={}", digest),
            format!("t=17e8,s={}", digest),
            format!("t=01700000000,s={}", digest),
            format!("t=00,s={}", digest),
            format!("t=99999999999999999999,s={}", digest),
            format!("t=1700000000,s={}", "A".repeat(64)),
            format!("t=1700000000,s={}", "a".repeat(63)),
            format!("t=1700000000,s={}", "a".repeat(65)),
            format!("t=1700000000,s={}", "g".repeat(64)),
            format!("t=1700000000,sig={}", digest),
        ];

        for case in cases {
            assert_eq!(
                case.parse::<SignatureHeader>(),
                Err(AuthFailure::MalformedSignature),
                "accepted {:?}",
                case
            );
        }
    }

    #[test]
    fn test_zero_timestamp_parses() {
        let header = format!("t=0,s={}", "a".repeat(64));
        assert_eq!(header.parse::<SignatureHeader>().unwrap().timestamp, 0);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = compute_signature(SECRET, 42, "POST", "/v1/orders", b"{\"a\":1}");
        let b = compute_signature(SECRET, 42, "POST", "/v1/orders", b"{\"a\":1}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_component_is_bound() {
        let base = compute_signature(SECRET, 42, "GET", "/v1/orders", b"body");

        assert_ne!(base, compute_signature(SECRET, 43, "GET", "/v1/orders", b"body"));
        assert_ne!(base, compute_signature(SECRET, 42, "POST", "/v1/orders", b"body"));
        assert_ne!(base, compute_signature(SECRET, 42, "GET", "/v1/Orders", b"body"));
        assert_ne!(base, compute_signature(SECRET, 42, "GET", "/v1/orders", b"bodY"));
        assert_ne!(
            base,
            compute_signature(b"another-secret-another-secret-xx", 42, "GET", "/v1/orders", b"body")
        );
    }

    #[test]
    fn test_field_boundaries_cannot_be_shifted() {
        // "GET\n/a" + "\nb" vs "GET\n/a\nb" + "": separators keep these apart
        let a = compute_signature(SECRET, 1, "GET", "/a", b"b");
        let b = compute_signature(SECRET, 1, "GET", "/a\nb", b"");
        assert_ne!(a, b);
    }

    #[test]
    fn test_digests_match_requires_every_byte() {
        let expected = compute_signature(SECRET, 1, "GET", "/", b"");
        assert!(digests_match(&expected, &expected));

        for i in 0..DIGEST_LENGTH {
            let mut provided = expected;
            provided[i] ^= 0x01;
            assert!(!digests_match(&expected, &provided));
        }
    }

    #[test]
    fn test_debug_hides_digest() {
        let header: SignatureHeader = valid_header().parse().unwrap();
        let printed = format!("{:?}", header);
        assert!(!printed.contains(&hex::encode(header.digest)));
    }
}
