//! Storage domain - read access to paginated resources

mod repository;

pub use repository::RecordStore;

#[cfg(test)]
pub use repository::mock;
