use crate::error::StorageError;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::Arc;

/// Column families for the ledger's durable maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    /// Membership roll: member_id → Member
    Members,
    /// Proposal records: proposal_id → Proposal
    Proposals,
    /// Cast votes: (proposal_id, voter) → Vote
    Votes,
    /// Singletons and counters: config, treasury, total stake, next id
    Meta,
}

impl ColumnFamily {
    fn name(&self) -> &'static str {
        match self {
            ColumnFamily::Members => "members",
            ColumnFamily::Proposals => "proposals",
            ColumnFamily::Votes => "votes",
            ColumnFamily::Meta => "meta",
        }
    }

    fn all() -> Vec<ColumnFamily> {
        vec![
            ColumnFamily::Members,
            ColumnFamily::Proposals,
            ColumnFamily::Votes,
            ColumnFamily::Meta,
        ]
    }
}

/// Database configuration options.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Max open files
    pub max_open_files: i32,
    /// Write buffer size in MB
    pub write_buffer_size_mb: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_open_files: 256,
            write_buffer_size_mb: 16,
        }
    }
}

/// RocksDB wrapper with column family support.
pub struct Database {
    db: Arc<DB>,
}

impl Database {
    /// Open a database at the given path.
    pub fn open(path: &Path, config: &DatabaseConfig) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_max_open_files(config.max_open_files);
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ColumnFamily::all()
            .into_iter()
            .map(|cf| ColumnFamilyDescriptor::new(cf.name(), Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        tracing::debug!(path = %path.display(), "opened ledger database");

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a value from the database.
    pub fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        let result = self.db.get_cf(&cf_handle, key)?;
        Ok(result)
    }

    /// Put a value into the database.
    pub fn put(&self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        self.db.put_cf(&cf_handle, key, value)?;
        Ok(())
    }

    /// Delete a value from the database.
    pub fn delete(&self, cf: ColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        self.db.delete_cf(&cf_handle, key)?;
        Ok(())
    }

    /// Iterate all key-value pairs in a column family, in key order.
    pub fn scan(&self, cf: ColumnFamily) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        let mut entries = Vec::new();
        for item in self.db.iterator_cf(&cf_handle, rocksdb::IteratorMode::Start) {
            let (key, value) = item?;
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }

    /// Perform a batch write. All writes in the batch commit atomically.
    pub fn batch_write(&self, batch: WriteBatch) -> Result<(), StorageError> {
        self.db.write(batch.inner)?;
        Ok(())
    }

    /// Create a new write batch.
    pub fn new_write_batch(&self) -> WriteBatch {
        WriteBatch::new(self.db.clone())
    }

    /// Create a snapshot of the database for consistent reads.
    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            snapshot: self.db.snapshot(),
            db: self.db.clone(),
        }
    }
}

/// Write batch for atomic multi-map mutations.
pub struct WriteBatch {
    inner: rocksdb::WriteBatch,
    db: Arc<DB>,
}

impl WriteBatch {
    fn new(db: Arc<DB>) -> Self {
        Self {
            inner: rocksdb::WriteBatch::default(),
            db,
        }
    }

    /// Put a value into the batch.
    pub fn put(&mut self, cf: ColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        self.inner.put_cf(&cf_handle, key, value);
        Ok(())
    }

    /// Delete a value in the batch.
    pub fn delete(&mut self, cf: ColumnFamily, key: &[u8]) -> Result<(), StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        self.inner.delete_cf(&cf_handle, key);
        Ok(())
    }

    /// Get the batch size.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if batch is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Database snapshot for consistent reads.
pub struct DatabaseSnapshot<'a> {
    snapshot: rocksdb::Snapshot<'a>,
    db: Arc<DB>,
}

impl<'a> DatabaseSnapshot<'a> {
    /// Get a value from the snapshot.
    pub fn get(&self, cf: ColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let cf_handle = self
            .db
            .cf_handle(cf.name())
            .ok_or_else(|| StorageError::InvalidColumnFamily(cf.name().to_string()))?;

        let result = self.snapshot.get_cf(&cf_handle, key)?;
        Ok(result)
    }
}
