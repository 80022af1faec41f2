//! Route scope policy

use std::collections::BTreeSet;

use super::error::AuthFailure;

pub const ORDERS_READ: &str = "orders:read";
pub const SHIPMENTS_READ: &str = "shipments:read";

/// Static mapping from path prefix to the scopes a caller must hold
#[derive(Debug, Clone, Default)]
pub struct ScopePolicy {
    rules: Vec<(String, BTreeSet<String>)>,
}

impl ScopePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for the partner read endpoints
    pub fn partner_api() -> Self {
        Self::new()
            .require("/v1/orders", [ORDERS_READ])
            .require("/v1/shipments", [SHIPMENTS_READ])
    }

    pub fn require(
        mut self,
        prefix: impl Into<String>,
        scopes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        self.rules
            .push((prefix, scopes.into_iter().map(Into::into).collect()));
        self
    }

    /// Scopes required for a path, from the longest matching prefix
    ///
    /// Prefixes match whole path segments: `/v1/orders` covers `/v1/orders`
    /// and `/v1/orders/ord_1` but not `/v1/orders-archive`.
    pub fn required_for(&self, path: &str) -> Option<&BTreeSet<String>> {
        let path = path.split('?').next().unwrap_or(path);

        self.rules
            .iter()
            .filter(|(prefix, _)| segment_prefix(path, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, scopes)| scopes)
    }

    /// Deny with `InsufficientScope` when any required scope is absent
    pub fn authorize(&self, path: &str, granted: &BTreeSet<String>) -> Result<(), AuthFailure> {
        match self.required_for(path) {
            Some(required) if !required.is_subset(granted) => Err(AuthFailure::InsufficientScope),
            _ => Ok(()),
        }
    }
}

fn segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
