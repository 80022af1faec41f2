//! Partner API wire types

pub mod error;
pub mod pagination;
pub mod query;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use pagination::{PaginatedResponse, PaginationMeta};
pub use query::{OrderListParams, PageParams, Query, ShipmentListParams};
