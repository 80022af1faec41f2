//! PostgreSQL record stores with keyset pagination

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder};

use crate::domain::pagination::{PageQuery, PageRecord, SortDirection, SortField, SortValue};
use crate::domain::storage::RecordStore;
use crate::domain::DomainError;

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/partner_api".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    /// Open a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Table mapping for a record served from postgres
pub trait PgRecord: PageRecord + Debug {
    const TABLE: &'static str;

    /// Select list, in the order [`PgRecord::from_row`] reads it
    const COLUMNS: &'static str;

    /// Append ` AND <condition>` for every set filter field
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &Self::Filter);

    fn from_row(row: &PgRow) -> Result<Self, DomainError>;
}

/// Record store over a single table
pub struct PostgresRecordStore<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R: PgRecord> Debug for PostgresRecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRecordStore")
            .field("table", &R::TABLE)
            .finish()
    }
}

impl<R: PgRecord> PostgresRecordStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

/// Build the keyset page query
///
/// The cursor condition is a row comparison, `(col, id) < (v, id)` for
/// descending order and `>` for ascending, so the id tiebreak always runs in
/// the same direction as the sort column.
pub(crate) fn build_page_query<'a, R: PgRecord>(
    query: &PageQuery<R::Filter, R::SortField>,
) -> QueryBuilder<'a, Postgres> {
    let column = query.sort.column();
    let mut builder =
        QueryBuilder::new(format!("SELECT {} FROM {} WHERE TRUE", R::COLUMNS, R::TABLE));

    R::push_filters(&mut builder, &query.filter);

    if let Some(after) = &query.after {
        let op = match query.direction {
            SortDirection::Asc => ">",
            SortDirection::Desc => "<",
        };

        builder.push(format!(" AND ({}, id) {} (", column, op));
        match &after.sort_value {
            SortValue::Timestamp(ts) => builder.push_bind(*ts),
            SortValue::Integer(n) => builder.push_bind(*n),
            SortValue::Text(s) => builder.push_bind(s.clone()),
        };
        builder.push(", ");
        builder.push_bind(after.id.clone());
        builder.push(")");
    }

    let direction = match query.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    builder.push(format!(
        " ORDER BY {column} {direction}, id {direction} LIMIT "
    ));
    builder.push_bind(query.fetch_limit() as i64);

    builder
}

#[async_trait]
impl<R: PgRecord> RecordStore<R> for PostgresRecordStore<R> {
    async fn query(
        &self,
        query: &PageQuery<R::Filter, R::SortField>,
    ) -> Result<Vec<R>, DomainError> {
        let rows = build_page_query::<R>(query)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to list {} records: {}", R::RESOURCE, e))
            })?;

        rows.iter().map(R::from_row).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<R>, DomainError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", R::COLUMNS, R::TABLE);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get {}: {}", R::RESOURCE, e)))?;

        row.as_ref().map(R::from_row).transpose()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("PostgreSQL health check failed: {}", e)))?;

        Ok(())
    }
}

/// Map a column decode failure
pub(crate) fn column_error(table: &str, e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to decode {} row: {}", table, e))
}
