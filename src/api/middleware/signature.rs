//! Request signature middleware for the partner routes

use std::net::{IpAddr, SocketAddr};

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::auth::VerifyError;
use crate::domain::{AuthFailure, SignedRequest};
use crate::infrastructure::observability::{record_auth_failure, record_auth_success};

/// Largest body buffered for signing
pub const MAX_SIGNED_BODY_BYTES: usize = 1024 * 1024;

const FORWARDED_FOR: &str = "x-forwarded-for";

// Stands in for header values that are not visible ASCII; it never parses
// as a signature and never names an issued key
const UNREADABLE_HEADER: &str = "\0";

/// Verify the signature headers, then the route's scopes
///
/// The body is buffered so the exact bytes that were signed can be checked,
/// and handed on unchanged. On success the [`AuthenticatedPartner`] is
/// available to handlers as a request extension.
///
/// [`AuthenticatedPartner`]: crate::domain::AuthenticatedPartner
pub async fn signature_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    let body = to_bytes(body, MAX_SIGNED_BODY_BYTES)
        .await
        .map_err(|_| ApiError::bad_request("Request body is too large or could not be read"))?;

    let client_addr = client_addr(&parts, state.auth.trust_forwarded_for);
    let signed_path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());

    let signed = SignedRequest {
        key_id: header_value(&parts.headers, &state.auth.key_header),
        signature: header_value(&parts.headers, &state.auth.signature_header),
        method: parts.method.as_str(),
        path: signed_path,
        body: &body,
        client_addr,
    };

    let partner = match state.verifier.verify(&signed, Utc::now().timestamp()).await {
        Ok(partner) => partner,
        Err(VerifyError::Rejected(failure)) => return Err(reject(failure)),
        Err(VerifyError::Lookup(e)) => return Err(ApiError::from(e)),
    };

    if let Err(failure) = state.scope_policy.authorize(parts.uri.path(), &partner.scopes) {
        return Err(reject(failure));
    }

    record_auth_success();
    debug!(partner_id = %partner.partner_id, key_id = %partner.key_id, "Partner authenticated");

    parts.extensions.insert(partner);
    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}

fn reject(failure: AuthFailure) -> ApiError {
    record_auth_failure(failure);
    warn!(reason = failure.reason_code(), "Partner request rejected");
    ApiError::from(failure)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .map(|value| value.to_str().unwrap_or(UNREADABLE_HEADER))
}

fn client_addr(parts: &Parts, trust_forwarded_for: bool) -> Option<IpAddr> {
    let forwarded = trust_forwarded_for
        .then(|| forwarded_for(&parts.headers))
        .flatten();

    forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

/// First address of `X-Forwarded-For`, the one the proxy saw
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7, 10.0.0.1"));

        assert_eq!(forwarded_for(&headers), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_for_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("unknown"));

        assert_eq!(forwarded_for(&headers), None);
    }

    #[test]
    fn test_forwarded_for_ignored_unless_trusted() {
        let (mut parts, _) = Request::builder()
            .header(FORWARDED_FOR, "203.0.113.7")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));

        assert_eq!(client_addr(&parts, false), Some("192.0.2.1".parse().unwrap()));
        assert_eq!(client_addr(&parts, true), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_missing_connect_info() {
        let (parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();
        assert_eq!(client_addr(&parts, true), None);
    }

    #[test]
    fn test_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert("x-partner-key", HeaderValue::from_static("pk_live_1"));
        headers.insert(
            "x-partner-signature",
            HeaderValue::from_bytes(b"t=1,s=\xff").unwrap(),
        );

        assert_eq!(header_value(&headers, "x-partner-key"), Some("pk_live_1"));
        assert_eq!(header_value(&headers, "x-missing"), None);
        assert_eq!(
            header_value(&headers, "x-partner-signature"),
            Some(UNREADABLE_HEADER)
        );
    }
}
