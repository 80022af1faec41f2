//! Partner credential lookups

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialLookup;
