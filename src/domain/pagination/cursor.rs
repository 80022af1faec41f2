//! Opaque pagination cursor codec
//!
//! A cursor is `base64url(payload) "." base64url(tag)` where the payload is
//! the JSON object `{"k":<kind>,"v":<sort value>,"id":<record id>}` and the
//! tag is a truncated HMAC-SHA256 of the payload under the configured cursor
//! key. Encoding is deterministic and carries no server-side state, so a
//! cursor stays valid across restarts for as long as the key is unchanged.
//!
//! Cursors do not record the filters or sort order they were minted under.
//! Clients must repeat the same query parameters on every page request.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use super::sort::{SortKind, SortValue};

type HmacSha256 = Hmac<Sha256>;

/// Longest token accepted by [`CursorCodec::decode`]
pub const MAX_CURSOR_LENGTH: usize = 512;

const TAG_LENGTH: usize = 16;
const SEPARATOR: char = '.';

/// Decoded cursor position: the last record of the previous page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub sort_value: SortValue,
    pub id: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor is empty or longer than {} characters", MAX_CURSOR_LENGTH)]
    Length,

    #[error("cursor structure is malformed")]
    Malformed,

    #[error("cursor is not valid base64url")]
    Encoding,

    #[error("cursor integrity check failed")]
    IntegrityCheckFailed,

    #[error("cursor payload is invalid")]
    InvalidPayload,

    #[error("cursor record id is empty")]
    EmptyId,

    #[error("cursor was issued for a {found} sort field, expected {expected}")]
    UnexpectedSortKind { expected: SortKind, found: SortKind },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CursorPayload {
    k: SortKind,
    v: serde_json::Value,
    id: String,
}

/// Encodes and decodes pagination cursors under a fixed key
#[derive(Clone)]
pub struct CursorCodec {
    key: Arc<[u8]>,
}

impl std::fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorCodec").field("key", &"[REDACTED]").finish()
    }
}

impl CursorCodec {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: Arc::from(key.as_ref()),
        }
    }

    pub fn encode(&self, sort_value: &SortValue, id: &str) -> String {
        let value = match sort_value {
            SortValue::Timestamp(ts) => {
                serde_json::Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            SortValue::Integer(n) => serde_json::Value::from(*n),
            SortValue::Text(s) => serde_json::Value::String(s.clone()),
        };

        let payload = serde_json::json!({
            "k": sort_value.kind(),
            "v": value,
            "id": id,
        })
        .to_string();

        let tag = self.tag(payload.as_bytes());

        format!(
            "{}{}{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            SEPARATOR,
            URL_SAFE_NO_PAD.encode(tag)
        )
    }

    /// Decode a token, requiring its sort value to be of `expected` kind
    pub fn decode(&self, token: &str, expected: SortKind) -> Result<Cursor, CursorError> {
        if token.is_empty() || token.len() > MAX_CURSOR_LENGTH {
            return Err(CursorError::Length);
        }

        let (payload_part, tag_part) = token.split_once(SEPARATOR).ok_or(CursorError::Malformed)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| CursorError::Encoding)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_part)
            .map_err(|_| CursorError::Encoding)?;

        if tag.len() != TAG_LENGTH {
            return Err(CursorError::IntegrityCheckFailed);
        }

        self.mac()
            .chain_update(&payload)
            .verify_truncated_left(&tag)
            .map_err(|_| CursorError::IntegrityCheckFailed)?;

        let raw: CursorPayload =
            serde_json::from_slice(&payload).map_err(|_| CursorError::InvalidPayload)?;

        if raw.k != expected {
            return Err(CursorError::UnexpectedSortKind {
                expected,
                found: raw.k,
            });
        }

        if raw.id.is_empty() {
            return Err(CursorError::EmptyId);
        }

        Ok(Cursor {
            sort_value: sort_value_from_json(raw.k, raw.v)?,
            id: raw.id,
        })
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size")
    }

    fn tag(&self, payload: &[u8]) -> [u8; TAG_LENGTH] {
        let digest = self.mac().chain_update(payload).finalize().into_bytes();
        let mut tag = [0u8; TAG_LENGTH];
        tag.copy_from_slice(&digest[..TAG_LENGTH]);
        tag
    }
}

fn sort_value_from_json(kind: SortKind, value: serde_json::Value) -> Result<SortValue, CursorError> {
    match (kind, value) {
        (SortKind::Timestamp, serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|ts| SortValue::Timestamp(ts.with_timezone(&Utc)))
            .map_err(|_| CursorError::InvalidPayload),
        (SortKind::Integer, serde_json::Value::Number(n)) => n
            .as_i64()
            .map(SortValue::Integer)
            .ok_or(CursorError::InvalidPayload),
        (SortKind::Text, serde_json::Value::String(s)) => Ok(SortValue::Text(s)),
        _ => Err(CursorError::InvalidPayload),
    }
}
