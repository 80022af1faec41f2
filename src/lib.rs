//! Partner API
//!
//! Read-only partner access to orders and shipments:
//! - HMAC-SHA256 request signatures with a replay window
//! - Per-route scopes and optional IP allowlists
//! - Opaque, integrity-checked cursors for keyset pagination
//! - In-memory or PostgreSQL backends selected by configuration

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::CursorCodec;
use infrastructure::storage::StoreFactory;
use tracing::{info, warn};

/// Create the application state for the configured backend
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.pagination.uses_default_key() {
        warn!("pagination.cursor_key is the built-in development key; set APP__PAGINATION__CURSOR_KEY in production");
    }

    let collaborators = StoreFactory::create(&config.store, &config.partners).await?;
    info!(backend = ?config.store.backend, "Collaborators initialized");

    Ok(AppState::new(
        collaborators,
        CursorCodec::new(&config.pagination.cursor_key),
        config.auth.clone(),
        config.rate_limit.clone(),
    ))
}
