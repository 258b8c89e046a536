//! Membership roll: stake-weighted identities with activity counters.

use crate::error::GovernanceError;
use crate::meta;
use agora_storage::{ColumnFamily, Database, WriteBatch};
use agora_types::{MemberId, Tick};
use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::Arc;

/// A registered member.
///
/// Created once per identity on join and never deleted. Stake is fixed at
/// join time; only the activity counters change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Member {
    pub id: MemberId,
    pub stake: u128,
    pub joined_at: Tick,
    /// Reputation score in [0, 100]
    pub reputation: u8,
    pub proposals_created: u64,
    pub votes_cast: u64,
}

impl Member {
    /// Reputation every member starts with.
    pub const INITIAL_REPUTATION: u8 = 50;

    pub fn new(id: MemberId, stake: u128, joined_at: Tick) -> Self {
        Self {
            id,
            stake,
            joined_at,
            reputation: Self::INITIAL_REPUTATION,
            proposals_created: 0,
            votes_cast: 0,
        }
    }
}

/// Typed view over the members column family plus the total-stake and
/// member-count meta counters.
pub struct MembershipRegistry {
    db: Arc<Database>,
}

impl MembershipRegistry {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get a member record.
    pub fn get(&self, id: &MemberId) -> Result<Option<Member>, GovernanceError> {
        match self.db.get(ColumnFamily::Members, id.as_bytes())? {
            Some(bytes) => Ok(Some(meta::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn is_member(&self, id: &MemberId) -> Result<bool, GovernanceError> {
        Ok(self.db.get(ColumnFamily::Members, id.as_bytes())?.is_some())
    }

    /// Voting power of an identity. Non-members have zero.
    pub fn lookup_stake(&self, id: &MemberId) -> Result<u128, GovernanceError> {
        Ok(self.get(id)?.map(|m| m.stake).unwrap_or(0))
    }

    /// Sum of all member stakes, the quorum denominator.
    pub fn total_stake(&self) -> Result<u128, GovernanceError> {
        Ok(meta::counter(&self.db, meta::TOTAL_STAKE, 0u128)?)
    }

    pub fn member_count(&self) -> Result<u64, GovernanceError> {
        Ok(meta::counter(&self.db, meta::MEMBER_COUNT, 0u64)?)
    }

    /// Stage a member record write into a batch.
    pub fn stage_put(&self, batch: &mut WriteBatch, member: &Member) -> Result<(), GovernanceError> {
        batch.put(
            ColumnFamily::Members,
            member.id.as_bytes(),
            &meta::encode(member)?,
        )?;
        Ok(())
    }

    pub fn stage_total_stake(
        &self,
        batch: &mut WriteBatch,
        total: u128,
    ) -> Result<(), GovernanceError> {
        meta::stage_counter(batch, meta::TOTAL_STAKE, &total)?;
        Ok(())
    }

    pub fn stage_member_count(
        &self,
        batch: &mut WriteBatch,
        count: u64,
    ) -> Result<(), GovernanceError> {
        meta::stage_counter(batch, meta::MEMBER_COUNT, &count)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_registry() -> (MembershipRegistry, TempDir) {
        let temp = TempDir::new().unwrap();
        let db = Arc::new(Database::open(temp.path(), &Default::default()).unwrap());
        (MembershipRegistry::new(db), temp)
    }

    fn commit_member(registry: &MembershipRegistry, member: &Member) {
        let mut batch = registry.db.new_write_batch();
        registry.stage_put(&mut batch, member).unwrap();
        registry.db.batch_write(batch).unwrap();
    }

    #[test]
    fn test_new_member_defaults() {
        let member = Member::new(MemberId::from_bytes([1u8; 20]), 100, 5);
        assert_eq!(member.stake, 100);
        assert_eq!(member.joined_at, 5);
        assert_eq!(member.reputation, Member::INITIAL_REPUTATION);
        assert_eq!(member.proposals_created, 0);
        assert_eq!(member.votes_cast, 0);
    }

    #[test]
    fn test_get_and_is_member() {
        let (registry, _temp) = test_registry();
        let id = MemberId::from_bytes([1u8; 20]);

        assert!(!registry.is_member(&id).unwrap());
        assert_eq!(registry.get(&id).unwrap(), None);

        commit_member(&registry, &Member::new(id, 100, 1));

        assert!(registry.is_member(&id).unwrap());
        let stored = registry.get(&id).unwrap().unwrap();
        assert_eq!(stored.stake, 100);
    }

    #[test]
    fn test_lookup_stake_zero_for_non_member() {
        let (registry, _temp) = test_registry();
        let id = MemberId::from_bytes([9u8; 20]);
        assert_eq!(registry.lookup_stake(&id).unwrap(), 0);

        commit_member(&registry, &Member::new(id, 42, 1));
        assert_eq!(registry.lookup_stake(&id).unwrap(), 42);
    }

    #[test]
    fn test_counters_default_to_zero() {
        let (registry, _temp) = test_registry();
        assert_eq!(registry.total_stake().unwrap(), 0);
        assert_eq!(registry.member_count().unwrap(), 0);
    }
}
