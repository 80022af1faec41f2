//! Fixed rate-limit headers
//!
//! No limiting is enforced; partners get stable `X-RateLimit-*` values to
//! build their clients against.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::RateLimitConfig;

pub const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

pub async fn rate_limit_headers_middleware(
    State(config): State<RateLimitConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(config.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(config.remaining));
    headers.insert(RATE_LIMIT_RESET, HeaderValue::from(config.reset_secs));

    response
}
