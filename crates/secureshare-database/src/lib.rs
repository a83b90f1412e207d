//! # secureshare-database
//!
//! The [`MetadataStore`] abstraction over file records, with a PostgreSQL
//! implementation for production and a concurrent in-memory one for tests
//! and single-node development.

pub mod connection;
pub mod migration;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{MemoryFileRecordStore, MetadataStore, PgFileRecordStore};
