use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid column family: {0}")]
    InvalidColumnFamily(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<borsh::io::Error> for StorageError {
    fn from(e: borsh::io::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
