//! Meta column family keys and codec helpers.
//!
//! Singletons and counters live under fixed keys in [`ColumnFamily::Meta`];
//! everything is borsh-encoded.

use agora_storage::{ColumnFamily, Database, DatabaseSnapshot, StorageError, WriteBatch};
use borsh::{BorshDeserialize, BorshSerialize};

pub(crate) const CONFIG: &[u8] = b"config";
pub(crate) const TREASURY_BALANCE: &[u8] = b"treasury_balance";
pub(crate) const TOTAL_STAKE: &[u8] = b"total_stake";
pub(crate) const MEMBER_COUNT: &[u8] = b"member_count";
pub(crate) const NEXT_PROPOSAL_ID: &[u8] = b"next_proposal_id";

pub(crate) fn encode<T: BorshSerialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    borsh::to_vec(value).map_err(StorageError::from)
}

pub(crate) fn decode<T: BorshDeserialize>(bytes: &[u8]) -> Result<T, StorageError> {
    T::try_from_slice(bytes).map_err(|e| StorageError::Deserialization(e.to_string()))
}

/// Read a meta counter, defaulting when the key has never been written.
pub(crate) fn counter<T>(db: &Database, key: &[u8], default: T) -> Result<T, StorageError>
where
    T: BorshDeserialize,
{
    match db.get(ColumnFamily::Meta, key)? {
        Some(bytes) => decode(&bytes),
        None => Ok(default),
    }
}

/// Read a meta counter from a snapshot, for multi-key consistent reads.
pub(crate) fn counter_at<T>(
    snapshot: &DatabaseSnapshot<'_>,
    key: &[u8],
    default: T,
) -> Result<T, StorageError>
where
    T: BorshDeserialize,
{
    match snapshot.get(ColumnFamily::Meta, key)? {
        Some(bytes) => decode(&bytes),
        None => Ok(default),
    }
}

pub(crate) fn stage_counter<T: BorshSerialize>(
    batch: &mut WriteBatch,
    key: &[u8],
    value: &T,
) -> Result<(), StorageError> {
    batch.put(ColumnFamily::Meta, key, &encode(value)?)
}
