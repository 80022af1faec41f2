//! Schema migrations for the postgres backend

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// May contain several statements
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// Applies migrations once each, recording them in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Apply a migration unless it is already recorded; returns whether it ran
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open transaction: {}", e)))?;

        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit().await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to commit migration {}: {}",
                migration.version, e
            ))
        })?;

        Ok(true)
    }

    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Schema for orders, shipments and partner credentials
///
/// Record ids use the "C" collation so the keyset tiebreak orders by bytes,
/// matching the in-memory backend.
pub fn partner_api_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create orders table",
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id TEXT COLLATE "C" PRIMARY KEY,
                status TEXT NOT NULL,
                customer_id TEXT NOT NULL,
                supplier_id TEXT NOT NULL,
                total_cents BIGINT NOT NULL,
                currency TEXT NOT NULL,
                item_count INTEGER NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_orders_created_at_id ON orders (created_at, id);
            CREATE INDEX IF NOT EXISTS idx_orders_updated_at_id ON orders (updated_at, id);
            CREATE INDEX IF NOT EXISTS idx_orders_total_cents_id ON orders (total_cents, id);
            CREATE INDEX IF NOT EXISTS idx_orders_customer_id ON orders (customer_id);
            "#,
        ),
        Migration::new(
            2,
            "Create shipments table",
            r#"
            CREATE TABLE IF NOT EXISTS shipments (
                id TEXT COLLATE "C" PRIMARY KEY,
                order_id TEXT NOT NULL,
                status TEXT NOT NULL,
                carrier TEXT NOT NULL,
                tracking_number TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                events JSONB NOT NULL DEFAULT '[]'::jsonb
            );
            CREATE INDEX IF NOT EXISTS idx_shipments_created_at_id ON shipments (created_at, id);
            CREATE INDEX IF NOT EXISTS idx_shipments_updated_at_id ON shipments (updated_at, id);
            CREATE INDEX IF NOT EXISTS idx_shipments_order_id ON shipments (order_id);
            "#,
        ),
        Migration::new(
            3,
            "Create partner credentials table",
            r#"
            CREATE TABLE IF NOT EXISTS partner_credentials (
                key_id TEXT PRIMARY KEY,
                partner_id TEXT NOT NULL,
                secret BYTEA NOT NULL CHECK (octet_length(secret) >= 32),
                scopes TEXT[] NOT NULL DEFAULT '{}',
                ip_allowlist TEXT[] NOT NULL DEFAULT '{}',
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        ),
    ]
}

/// Apply every pending migration in version order
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in partner_api_migrations() {
        if migrator.run_migration(&migration).await? {
            info!(version = migration.version, "Applied migration: {}", migration.description);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_strictly_ascending() {
        let migrations = partner_api_migrations();

        for pair in migrations.windows(2) {
            assert!(pair[1].version > pair[0].version);
        }
    }

    #[test]
    fn test_record_tables_use_byte_collation_for_ids() {
        for migration in partner_api_migrations().iter().take(2) {
            assert!(migration.up.contains(r#"id TEXT COLLATE "C" PRIMARY KEY"#));
        }
    }

    #[test]
    fn test_credentials_table_enforces_secret_floor() {
        let migrations = partner_api_migrations();
        let credentials = migrations
            .iter()
            .find(|m| m.up.contains("partner_credentials"))
            .unwrap();

        assert!(credentials.up.contains("octet_length(secret) >= 32"));
    }
}
