//! Attach the request id to error envelopes

use axum::{
    body::Body,
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::RequestId;
use tracing::error;

use crate::api::types::ApiErrorResponse;

/// Re-render error bodies with `request_id` filled in
///
/// Must run inside `SetRequestIdLayer`. [`ApiError`] leaves its envelope in
/// the response extensions; responses without one pass through untouched.
///
/// [`ApiError`]: crate::api::types::ApiError
pub async fn error_request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(request).await;

    let Some(mut envelope) = response.extensions_mut().remove::<ApiErrorResponse>() else {
        return response;
    };
    let Some(request_id) = request_id else {
        return response;
    };

    envelope.error.request_id = Some(request_id);
    match serde_json::to_vec(&envelope) {
        Ok(body) => {
            response.headers_mut().remove(CONTENT_LENGTH);
            *response.body_mut() = Body::from(body);
        }
        Err(e) => error!(error = %e, "Failed to render error envelope"),
    }

    response
}
