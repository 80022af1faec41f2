//! Storage infrastructure - record store implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;
mod records;
mod seed;

pub use factory::{Collaborators, StoreFactory};
pub use in_memory::InMemoryRecordStore;
pub use migrations::{run_migrations, Migration, PostgresMigrator};
pub use postgres::{PgRecord, PostgresConfig, PostgresRecordStore};
pub use seed::{demo_orders, demo_shipments, DEMO_ORDER_COUNT};
