//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, LogFormat, LoggingConfig, PaginationConfig, PartnerConfig,
    RateLimitConfig, ServerConfig, StoreBackend, StoreConfig, DEFAULT_CURSOR_KEY,
};
