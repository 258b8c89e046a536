//! Vote ledger: one immutable record per (proposal, voter) pair.

use crate::error::GovernanceError;
use crate::meta;
use agora_storage::{ColumnFamily, Database, WriteBatch};
use agora_types::{MemberId, Tick};
use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::Arc;

/// A cast vote.
///
/// The weight is a snapshot of the voter's stake at cast time and is never
/// re-derived from a later-changed stake.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Vote {
    pub proposal_id: u64,
    pub voter: MemberId,
    pub approve: bool,
    pub weight: u128,
    pub cast_at: Tick,
}

impl Vote {
    pub fn new(proposal_id: u64, voter: MemberId, approve: bool, weight: u128, cast_at: Tick) -> Self {
        Self {
            proposal_id,
            voter,
            approve,
            weight,
            cast_at,
        }
    }
}

/// Typed view over the votes column family.
///
/// Keys are `proposal_id (big-endian) ++ voter`, so one proposal's votes
/// are contiguous in scan order.
pub struct VoteLedger {
    db: Arc<Database>,
}

impl VoteLedger {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn key(proposal_id: u64, voter: &MemberId) -> [u8; 28] {
        let mut key = [0u8; 28];
        key[..8].copy_from_slice(&proposal_id.to_be_bytes());
        key[8..].copy_from_slice(voter.as_bytes());
        key
    }

    /// Get the vote a member cast on a proposal, if any.
    pub fn get(&self, proposal_id: u64, voter: &MemberId) -> Result<Option<Vote>, GovernanceError> {
        match self.db.get(ColumnFamily::Votes, &Self::key(proposal_id, voter))? {
            Some(bytes) => Ok(Some(meta::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_voted(&self, proposal_id: u64, voter: &MemberId) -> Result<bool, GovernanceError> {
        Ok(self
            .db
            .get(ColumnFamily::Votes, &Self::key(proposal_id, voter))?
            .is_some())
    }

    /// All votes cast on one proposal.
    pub fn for_proposal(&self, proposal_id: u64) -> Result<Vec<Vote>, GovernanceError> {
        let prefix = proposal_id.to_be_bytes();
        let mut votes = Vec::new();
        for (key, bytes) in self.db.scan(ColumnFamily::Votes)? {
            if key.starts_with(&prefix) {
                votes.push(meta::decode(&bytes)?);
            }
        }
        Ok(votes)
    }

    /// Stage a vote insert into a batch.
    pub fn stage_insert(&self, batch: &mut WriteBatch, vote: &Vote) -> Result<(), GovernanceError> {
        batch.put(
            ColumnFamily::Votes,
            &Self::key(vote.proposal_id, &vote.voter),
            &meta::encode(vote)?,
        )?;
        Ok(())
    }
}
