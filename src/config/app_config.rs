use serde::Deserialize;

use crate::domain::partner::{CredentialError, PartnerCredential, PartnerId, PartnerSecret};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Cursor key used when none is configured; fine for local runs only
pub const DEFAULT_CURSOR_KEY: &str = "partner-api-development-cursor-key";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Request authentication settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_key_header")]
    pub key_header: String,
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
    /// Take the client address from the first `X-Forwarded-For` entry.
    /// Only enable behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_cursor_key")]
    pub cursor_key: String,
}

/// Values for the fixed `X-RateLimit-*` response headers
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit")]
    pub limit: u32,
    #[serde(default = "default_rate_limit")]
    pub remaining: u32,
    #[serde(default = "default_rate_limit_reset")]
    pub reset_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Seeded demo dataset with credentials from `partners`
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub postgres: PostgresConfig,
}

/// A partner credential declared in configuration
#[derive(Clone, Deserialize)]
pub struct PartnerConfig {
    pub key_id: String,
    pub partner_id: String,
    /// Shared secret; its UTF-8 bytes are the HMAC key
    pub secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl std::fmt::Debug for PartnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerConfig")
            .field("key_id", &self.key_id)
            .field("partner_id", &self.partner_id)
            .field("secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("ip_allowlist", &self.ip_allowlist)
            .field("active", &self.active)
            .finish()
    }
}

impl PartnerConfig {
    pub fn to_credential(&self) -> Result<PartnerCredential, CredentialError> {
        let credential = PartnerCredential::new(
            self.key_id.clone(),
            PartnerId::new(self.partner_id.clone())?,
            PartnerSecret::new(self.secret.as_bytes())?,
        )?
        .with_scopes(self.scopes.iter().cloned())
        .with_ip_allowlist_strs(self.ip_allowlist.as_slice())?
        .with_active(self.active);

        Ok(credential)
    }
}

fn default_key_header() -> String {
    "x-partner-key".to_string()
}

fn default_signature_header() -> String {
    "x-partner-signature".to_string()
}

fn default_cursor_key() -> String {
    DEFAULT_CURSOR_KEY.to_string()
}

fn default_rate_limit() -> u32 {
    1000
}

fn default_rate_limit_reset() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            key_header: default_key_header(),
            signature_header: default_signature_header(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            cursor_key: default_cursor_key(),
        }
    }
}

impl PaginationConfig {
    pub fn uses_default_key(&self) -> bool {
        self.cursor_key == DEFAULT_CURSOR_KEY
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_rate_limit(),
            remaining: default_rate_limit(),
            reset_secs: default_rate_limit_reset(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/local`, then `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
