//! Governance parameters: admin identity and voting thresholds.

use crate::error::GovernanceError;
use crate::meta;
use agora_storage::{ColumnFamily, Database, WriteBatch};
use agora_types::MemberId;
use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::Arc;

/// Mutable, admin-controlled parameters. Singleton record in the meta
/// column family; mutation only through the admin-gated entry points.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DaoConfig {
    pub admin: MemberId,
    /// Voting window length in ticks
    pub proposal_duration: u64,
    /// Minimum votes-cast share of total stake, in [0, 100]
    pub quorum_threshold_pct: u8,
    /// Minimum yes-share of votes cast, in [0, 100]
    pub approval_threshold_pct: u8,
}

impl DaoConfig {
    pub const DEFAULT_DURATION: u64 = 100_800;
    pub const DEFAULT_QUORUM_PCT: u8 = 30;
    pub const DEFAULT_APPROVAL_PCT: u8 = 50;

    /// Genesis configuration for a fresh ledger.
    pub fn new(admin: MemberId) -> Self {
        Self {
            admin,
            proposal_duration: Self::DEFAULT_DURATION,
            quorum_threshold_pct: Self::DEFAULT_QUORUM_PCT,
            approval_threshold_pct: Self::DEFAULT_APPROVAL_PCT,
        }
    }
}

/// Typed view over the config singleton.
pub struct ConfigStore {
    db: Arc<Database>,
}

impl ConfigStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Load the stored config, if one has been written.
    pub fn get(&self) -> Result<Option<DaoConfig>, GovernanceError> {
        match self.db.get(ColumnFamily::Meta, meta::CONFIG)? {
            Some(bytes) => Ok(Some(meta::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the stored config; the ledger writes one at open, so a missing
    /// record means the database was tampered with.
    pub fn load(&self) -> Result<DaoConfig, GovernanceError> {
        self.get()?.ok_or_else(|| {
            GovernanceError::Storage(agora_storage::StorageError::Deserialization(
                "missing config record".to_string(),
            ))
        })
    }

    pub fn stage_put(&self, batch: &mut WriteBatch, config: &DaoConfig) -> Result<(), GovernanceError> {
        batch.put(ColumnFamily::Meta, meta::CONFIG, &meta::encode(config)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_genesis_defaults() {
        let admin = MemberId::from_bytes([1u8; 20]);
        let config = DaoConfig::new(admin);

        assert_eq!(config.admin, admin);
        assert_eq!(config.proposal_duration, 100_800);
        assert_eq!(config.quorum_threshold_pct, 30);
        assert_eq!(config.approval_threshold_pct, 50);
    }

    #[test]
    fn test_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let db = Arc::new(Database::open(temp.path(), &Default::default()).unwrap());
        let store = ConfigStore::new(db.clone());

        assert_eq!(store.get().unwrap(), None);

        let config = DaoConfig::new(MemberId::from_bytes([1u8; 20]));
        let mut batch = db.new_write_batch();
        store.stage_put(&mut batch, &config).unwrap();
        db.batch_write(batch).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }
}
