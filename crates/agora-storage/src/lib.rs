//! Agora Storage - Durable key-value maps for the governance ledger.
//!
//! One RocksDB column family per durable map, with batch writes for
//! atomic multi-map commits and snapshots for consistent reads.

pub mod db;
pub mod error;

pub use db::{ColumnFamily, Database, DatabaseConfig, DatabaseSnapshot, WriteBatch};
pub use error::StorageError;
