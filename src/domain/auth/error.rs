use thiserror::Error;

/// Reason a request failed authentication or authorization
///
/// The variant is kept for audit logs and metrics. Callers only ever see the
/// coarse `unauthorized`/`forbidden` outcome and [`AuthFailure::public_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AuthFailure {
    #[error("API key header is missing")]
    MissingKey,

    #[error("signature header is missing")]
    MissingSignature,

    #[error("signature header is malformed")]
    MalformedSignature,

    #[error("request timestamp is outside the replay window")]
    StaleTimestamp,

    #[error("API key is unknown or inactive")]
    UnknownKey,

    #[error("signature does not match")]
    BadSignature,

    #[error("credential lacks a scope required by the route")]
    InsufficientScope,

    #[error("caller address is not in the credential's allowlist")]
    IpDenied,
}

impl AuthFailure {
    pub const ALL: [AuthFailure; 8] = [
        Self::MissingKey,
        Self::MissingSignature,
        Self::MalformedSignature,
        Self::StaleTimestamp,
        Self::UnknownKey,
        Self::BadSignature,
        Self::InsufficientScope,
        Self::IpDenied,
    ];

    /// Stable reason code for logs and metric labels
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::MissingSignature => "missing_signature",
            Self::MalformedSignature => "malformed_signature",
            Self::StaleTimestamp => "stale_timestamp",
            Self::UnknownKey => "unknown_key",
            Self::BadSignature => "bad_signature",
            Self::InsufficientScope => "insufficient_scope",
            Self::IpDenied => "ip_denied",
        }
    }

    /// Authenticated but not permitted, as opposed to not authenticated at all
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::InsufficientScope | Self::IpDenied)
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingKey => "API key header is required",
            Self::MissingSignature => "Request signature header is required",
            Self::MalformedSignature => "Request signature header is malformed",
            Self::StaleTimestamp => "Request timestamp is outside the allowed window",
            Self::UnknownKey | Self::BadSignature => "Invalid API key or signature",
            Self::InsufficientScope => "API key is not permitted to access this resource",
            Self::IpDenied => "Requests from this address are not permitted for this API key",
        }
    }
}
