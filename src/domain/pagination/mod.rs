//! Cursor-based pagination
//!
//! Listings are ordered by a resource sort field with the record id as a
//! tiebreak, which gives a total order. A page is resumed strictly after the
//! `(sort value, id)` pair carried by the cursor.

mod cursor;
mod page;
mod sort;

pub use cursor::{Cursor, CursorCodec, CursorError, MAX_CURSOR_LENGTH};
pub use page::{clamp_limit, Page, PageQuery, PageRecord, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use sort::{SortDirection, SortField, SortKind, SortValue};
