//! Record store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::pagination::{PageQuery, PageRecord};
use crate::domain::DomainError;

/// Read-only, ordered access to a resource's records
#[async_trait]
pub trait RecordStore<R>: Send + Sync + Debug
where
    R: PageRecord,
{
    /// Returns up to `query.fetch_limit()` records matching the filter,
    /// strictly after the cursor in `(sort field, id)` order
    async fn query(&self, query: &PageQuery<R::Filter, R::SortField>) -> Result<Vec<R>, DomainError>;

    /// Retrieves a record by id
    async fn get(&self, id: &str) -> Result<Option<R>, DomainError>;

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
