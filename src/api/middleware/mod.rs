//! API middleware components

pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod request_id;
pub mod signature;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::rate_limit_headers_middleware;
pub use request_id::error_request_id_middleware;
pub use signature::signature_middleware;
