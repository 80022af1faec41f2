//! Credential lookup from the `partner_credentials` table

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::partner::{CredentialLookup, PartnerCredential, PartnerId, PartnerSecret};
use crate::domain::DomainError;

pub struct PostgresCredentialLookup {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresCredentialLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCredentialLookup")
            .field("table", &"partner_credentials")
            .finish()
    }
}

impl PostgresCredentialLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn credential_from_row(row: &PgRow) -> Result<PartnerCredential, DomainError> {
    let decode =
        |e: sqlx::Error| DomainError::storage(format!("Failed to decode partner credential: {}", e));
    // Stored data that fails validation is a storage fault, never an auth outcome
    let invalid = |e: crate::domain::partner::CredentialError| {
        DomainError::storage(format!("Stored partner credential is invalid: {}", e))
    };

    let key_id: String = row.try_get("key_id").map_err(decode)?;
    let partner_id: String = row.try_get("partner_id").map_err(decode)?;
    let secret: Vec<u8> = row.try_get("secret").map_err(decode)?;
    let scopes: Vec<String> = row.try_get("scopes").map_err(decode)?;
    let ip_allowlist: Vec<String> = row.try_get("ip_allowlist").map_err(decode)?;
    let active: bool = row.try_get("active").map_err(decode)?;

    let credential = PartnerCredential::new(
        key_id,
        PartnerId::new(partner_id).map_err(invalid)?,
        PartnerSecret::new(secret).map_err(invalid)?,
    )
    .map_err(invalid)?
    .with_scopes(scopes)
    .with_ip_allowlist_strs(ip_allowlist.as_slice())
    .map_err(invalid)?
    .with_active(active);

    Ok(credential)
}

#[async_trait]
impl CredentialLookup for PostgresCredentialLookup {
    async fn find(&self, key_id: &str) -> Result<Option<PartnerCredential>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT key_id, partner_id, secret, scopes, ip_allowlist, active
            FROM partner_credentials
            WHERE key_id = $1
            "#,
        )
        .bind(key_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to look up partner credential: {}", e)))?;

        row.as_ref().map(credential_from_row).transpose()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1 FROM partner_credentials LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Partner credential table unavailable: {}", e))
            })?;

        Ok(())
    }
}
