//! Pagination envelope for list responses

use serde::{Deserialize, Serialize};

use crate::domain::Page;

/// `{"data": [...], "pagination": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub limit: u32,
    pub has_more: bool,
    /// Always present; `null` on the last page
    pub next_cursor: Option<String>,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            pagination: PaginationMeta {
                limit: page.limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        }
    }
}
