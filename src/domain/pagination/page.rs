//! Page requests and page assembly

use super::cursor::{Cursor, CursorCodec};
use super::sort::{SortDirection, SortField, SortValue};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Global page size ceiling; resources may impose a lower one
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Clamp a requested page size into `[1, min(ceiling, MAX_PAGE_LIMIT)]`
pub fn clamp_limit(requested: Option<u32>, ceiling: u32) -> u32 {
    let ceiling = ceiling.clamp(1, MAX_PAGE_LIMIT);

    requested
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, ceiling)
}

/// A record that can be listed with keyset pagination
pub trait PageRecord: Clone + Send + Sync + 'static {
    type Filter: Send + Sync;
    type SortField: SortField;

    /// Resource name used in messages, e.g. `order`
    const RESOURCE: &'static str;

    /// Largest page this resource serves
    const MAX_PAGE_LIMIT: u32 = MAX_PAGE_LIMIT;

    fn id(&self) -> &str;

    fn sort_value(&self, field: Self::SortField) -> SortValue;

    /// Whether the record satisfies every condition in the filter
    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// Everything a store needs to produce one page of candidates
#[derive(Debug, Clone)]
pub struct PageQuery<F, S> {
    pub filter: F,
    pub sort: S,
    pub direction: SortDirection,
    pub after: Option<Cursor>,
    pub limit: u32,
}

impl<F, S> PageQuery<F, S> {
    /// Number of records to request: one more than the page holds
    pub fn fetch_limit(&self) -> usize {
        self.limit as usize + 1
    }
}

/// One assembled page of results
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub limit: u32,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl<R: PageRecord> Page<R> {
    /// Build a page from the store's `limit + 1` candidates
    ///
    /// If the extra record is present the page is truncated to `limit`, and
    /// the cursor is minted from the last record kept.
    pub fn assemble(
        mut candidates: Vec<R>,
        limit: u32,
        sort: R::SortField,
        codec: &CursorCodec,
    ) -> Self {
        let has_more = candidates.len() > limit as usize;

        if has_more {
            candidates.truncate(limit as usize);
        }

        let next_cursor = if has_more {
            candidates
                .last()
                .map(|last| codec.encode(&last.sort_value(sort), last.id()))
        } else {
            None
        };

        Self {
            items: candidates,
            limit,
            has_more,
            next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pagination::SortKind;
    use crate::domain::DomainError;

    #[derive(Debug, Clone, Copy)]
    struct Rank;

    impl std::str::FromStr for Rank {
        type Err = DomainError;

        fn from_str(_: &str) -> Result<Self, Self::Err> {
            Ok(Rank)
        }
    }

    impl SortField for Rank {
        fn as_str(self) -> &'static str {
            "rank"
        }

        fn column(self) -> &'static str {
            "rank"
        }

        fn kind(self) -> SortKind {
            SortKind::Integer
        }
    }

    #[derive(Debug, Clone)]
    struct Item(i64);

    impl PageRecord for Item {
        type Filter = ();
        type SortField = Rank;

        const RESOURCE: &'static str = "item";

        fn id(&self) -> &str {
            "item"
        }

        fn sort_value(&self, _: Rank) -> SortValue {
            SortValue::Integer(self.0)
        }

        fn matches(&self, _: &()) -> bool {
            true
        }
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, MAX_PAGE_LIMIT), DEFAULT_PAGE_LIMIT);
        assert_eq!(clamp_limit(Some(0), MAX_PAGE_LIMIT), 1);
        assert_eq!(clamp_limit(Some(75), MAX_PAGE_LIMIT), 75);
        assert_eq!(clamp_limit(Some(5000), MAX_PAGE_LIMIT), 200);
        assert_eq!(clamp_limit(Some(5000), 20), 20);
        assert_eq!(clamp_limit(None, 20), 20);
        assert_eq!(clamp_limit(Some(10), 1000), 10);
        assert_eq!(clamp_limit(Some(1000), 1000), 200);
    }

    #[test]
    fn test_fetch_limit_asks_for_one_extra() {
        let query = PageQuery {
            filter: (),
            sort: Rank,
            direction: SortDirection::Desc,
            after: None,
            limit: 25,
        };
        assert_eq!(query.fetch_limit(), 26);
    }

    #[test]
    fn test_assemble_with_extra_record() {
        let codec = CursorCodec::new("k");
        let page = Page::assemble(vec![Item(3), Item(2), Item(1)], 2, Rank, &codec);

        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let cursor = codec
            .decode(page.next_cursor.as_deref().unwrap(), SortKind::Integer)
            .unwrap();
        assert_eq!(cursor.sort_value, SortValue::Integer(2));
    }

    #[test]
    fn test_assemble_final_page() {
        let codec = CursorCodec::new("k");

        let exact = Page::assemble(vec![Item(2), Item(1)], 2, Rank, &codec);
        assert!(!exact.has_more);
        assert!(exact.next_cursor.is_none());

        let empty = Page::<Item>::assemble(Vec::new(), 2, Rank, &codec);
        assert!(empty.items.is_empty());
        assert!(!empty.has_more);
        assert_eq!(empty.limit, 2);
    }
}
