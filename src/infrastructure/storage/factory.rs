//! Backend selection for record stores and credential lookup

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{PartnerConfig, StoreBackend, StoreConfig};
use crate::domain::order::Order;
use crate::domain::partner::CredentialLookup;
use crate::domain::shipment::Shipment;
use crate::domain::storage::RecordStore;
use crate::domain::DomainError;
use crate::infrastructure::partner::{InMemoryCredentialStore, PostgresCredentialLookup};

use super::in_memory::InMemoryRecordStore;
use super::migrations::{run_migrations, PostgresMigrator};
use super::postgres::PostgresRecordStore;
use super::seed::{demo_orders, demo_shipments};

/// Data-access collaborators handed to the API layer
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub orders: Arc<dyn RecordStore<Order>>,
    pub shipments: Arc<dyn RecordStore<Shipment>>,
    pub credentials: Arc<dyn CredentialLookup>,
}

#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Build every collaborator for the configured backend
    pub async fn create(
        store: &StoreConfig,
        partners: &[PartnerConfig],
    ) -> Result<Collaborators, DomainError> {
        match store.backend {
            StoreBackend::Memory => Self::create_in_memory(partners),
            StoreBackend::Postgres => {
                if !partners.is_empty() {
                    warn!(
                        count = partners.len(),
                        "Ignoring configured partners; credentials are read from partner_credentials"
                    );
                }

                let pool = store.postgres.connect().await?;
                run_migrations(&pool).await?;

                let version = PostgresMigrator::new(pool.clone()).current_version().await?;
                info!(schema_version = ?version, "Using PostgreSQL backend");

                Ok(Collaborators {
                    orders: Arc::new(PostgresRecordStore::<Order>::new(pool.clone())),
                    shipments: Arc::new(PostgresRecordStore::<Shipment>::new(pool.clone())),
                    credentials: Arc::new(PostgresCredentialLookup::new(pool)),
                })
            }
        }
    }

    /// Seeded demo stores with credentials from configuration
    pub fn create_in_memory(partners: &[PartnerConfig]) -> Result<Collaborators, DomainError> {
        let credentials = InMemoryCredentialStore::from_config(partners)?;

        if credentials.is_empty() {
            warn!("No partners configured; every signed request will be rejected");
        }

        let orders = demo_orders();
        let shipments = demo_shipments(&orders);

        info!(
            orders = orders.len(),
            shipments = shipments.len(),
            partners = credentials.len(),
            "Using in-memory backend with demo dataset"
        );

        Ok(Collaborators {
            orders: Arc::new(InMemoryRecordStore::with_records(orders)),
            shipments: Arc::new(InMemoryRecordStore::with_records(shipments)),
            credentials: Arc::new(credentials),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::DEMO_ORDER_COUNT;

    #[tokio::test]
    async fn test_memory_backend_is_seeded() {
        let collaborators = StoreFactory::create(&StoreConfig::default(), &[])
            .await
            .unwrap();

        assert!(collaborators.orders.get("ord_0001").await.unwrap().is_some());
        assert!(collaborators
            .orders
            .get(&format!("ord_{:04}", DEMO_ORDER_COUNT + 1))
            .await
            .unwrap()
            .is_none());
        assert!(collaborators.shipments.get("shp_0001").await.unwrap().is_some());
        assert!(collaborators.credentials.find("pk_any").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_rejects_invalid_partner() {
        let partner = PartnerConfig {
            key_id: "pk_short".to_string(),
            partner_id: "acme".to_string(),
            secret: "short".to_string(),
            scopes: vec![],
            ip_allowlist: vec![],
            active: true,
        };

        let result = StoreFactory::create(&StoreConfig::default(), &[partner]).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
