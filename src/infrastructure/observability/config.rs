//! Observability configuration

use serde::Deserialize;

use crate::domain::DomainError;

// Paths owned by the API router; a scrape route on any of them would conflict
const RESERVED_PREFIXES: [&str; 4] = ["/v1", "/health", "/live", "/ready"];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export; local log output is configured under `logging`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of traces kept, in `[0.0, 1.0]`
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint, served without request signatures
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Reject settings that would fail later at router build or exporter setup
    pub fn validate(&self) -> Result<(), DomainError> {
        let ratio = self.tracing.sampling_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(DomainError::configuration(format!(
                "observability.tracing.sampling_ratio must be within [0, 1], got {}",
                ratio
            )));
        }

        if self.metrics.enabled {
            let path = self.metrics.path.as_str();
            if !path.starts_with('/') || path.len() < 2 {
                return Err(DomainError::configuration(format!(
                    "observability.metrics.path must be an absolute path, got '{}'",
                    path
                )));
            }
            if RESERVED_PREFIXES
                .iter()
                .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
            {
                return Err(DomainError::configuration(format!(
                    "observability.metrics.path '{}' collides with an API route",
                    path
                )));
            }
        }

        Ok(())
    }
}
