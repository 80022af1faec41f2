//! In-memory record store

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::pagination::{PageQuery, PageRecord, SortDirection, SortValue};
use crate::domain::storage::RecordStore;
use crate::domain::DomainError;

/// Thread-safe in-memory record store
///
/// Every query scans the full set, so this is meant for development, demos
/// and tests. Records can be inserted or replaced while clients are paging.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    records: RwLock<HashMap<String, R>>,
}

impl<R: PageRecord> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PageRecord> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();

        Self {
            records: RwLock::new(map),
        }
    }

    /// Insert a record, replacing any with the same id
    pub fn upsert(&self, record: R) -> Result<(), DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        records.insert(record.id().to_string(), record);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<Option<R>, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(records.remove(id))
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compare two `(sort value, id)` keys in the requested direction
fn compare_keys(
    a: (&SortValue, &str),
    b: (&SortValue, &str),
    direction: SortDirection,
) -> Ordering {
    let ascending = a.0.cmp(b.0).then_with(|| a.1.cmp(b.1));

    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

#[async_trait]
impl<R> RecordStore<R> for InMemoryRecordStore<R>
where
    R: PageRecord + Debug,
{
    async fn query(
        &self,
        query: &PageQuery<R::Filter, R::SortField>,
    ) -> Result<Vec<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut keyed: Vec<(SortValue, &R)> = records
            .values()
            .filter(|record| record.matches(&query.filter))
            .map(|record| (record.sort_value(query.sort), record))
            .filter(|(value, record)| match &query.after {
                Some(cursor) => {
                    compare_keys(
                        (value, record.id()),
                        (&cursor.sort_value, &cursor.id),
                        query.direction,
                    ) == Ordering::Greater
                }
                None => true,
            })
            .collect();

        keyed.sort_by(|(va, ra), (vb, rb)| {
            compare_keys((va, ra.id()), (vb, rb.id()), query.direction)
        });

        Ok(keyed
            .into_iter()
            .take(query.fetch_limit())
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<R>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.get(id).cloned())
    }
}
