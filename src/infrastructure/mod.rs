//! Infrastructure layer - storage backends, credential sources and observability

pub mod observability;
pub mod partner;
pub mod services;
pub mod storage;
