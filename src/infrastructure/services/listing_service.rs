//! Listing service - paginated reads over a record store

use std::sync::Arc;

use tracing::debug;

use crate::domain::pagination::{
    clamp_limit, CursorCodec, Page, PageQuery, PageRecord, SortDirection, SortField,
};
use crate::domain::storage::RecordStore;
use crate::domain::DomainError;

/// Parameters of one list call, as parsed from the query string
#[derive(Debug, Clone)]
pub struct ListRequest<F, S> {
    pub filter: F,
    pub sort: Option<S>,
    pub direction: SortDirection,
    /// Opaque token from a previous page's `next_cursor`
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl<F: Default, S> Default for ListRequest<F, S> {
    fn default() -> Self {
        Self {
            filter: F::default(),
            sort: None,
            direction: SortDirection::default(),
            cursor: None,
            limit: None,
        }
    }
}

/// Paginated list and single-record reads for one resource
#[derive(Debug)]
pub struct ListingService<R: PageRecord> {
    store: Arc<dyn RecordStore<R>>,
    codec: CursorCodec,
}

impl<R: PageRecord> Clone for ListingService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codec: self.codec.clone(),
        }
    }
}

impl<R> ListingService<R>
where
    R: PageRecord,
    R::SortField: Default,
{
    pub fn new(store: Arc<dyn RecordStore<R>>, codec: CursorCodec) -> Self {
        Self { store, codec }
    }

    /// Fetch one page
    ///
    /// The cursor is decoded before the store is touched, so a bad cursor
    /// never costs a query.
    pub async fn list(
        &self,
        request: ListRequest<R::Filter, R::SortField>,
    ) -> Result<Page<R>, DomainError> {
        let sort = request.sort.unwrap_or_default();
        let limit = clamp_limit(request.limit, R::MAX_PAGE_LIMIT);

        let after = request
            .cursor
            .as_deref()
            .map(|token| self.codec.decode(token, sort.kind()))
            .transpose()?;

        let query = PageQuery {
            filter: request.filter,
            sort,
            direction: request.direction,
            after,
            limit,
        };

        let candidates = self.store.query(&query).await?;
        let page = Page::assemble(candidates, limit, sort, &self.codec);

        debug!(
            resource = R::RESOURCE,
            sort = sort.as_str(),
            direction = query.direction.as_str(),
            limit,
            returned = page.items.len(),
            has_more = page.has_more,
            "Listed page"
        );

        Ok(page)
    }

    pub async fn get(&self, id: &str) -> Result<R, DomainError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("{} '{}' not found", capitalize(R::RESOURCE), id))
            })
    }

    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.store.health_check().await
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
