//! Proposal lifecycle management.
//!
//! Proposals move strictly one way: Active -> Approved/Rejected -> Executed.

use crate::error::GovernanceError;
use crate::meta;
use agora_storage::{ColumnFamily, Database, WriteBatch};
use agora_types::{Description, ImpactMetrics, Link, MemberId, Tick, Title};
use borsh::{BorshDeserialize, BorshSerialize};
use std::sync::Arc;

/// Proposal status in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ProposalStatus {
    /// Voting is open until the expiry tick
    Active,
    /// Voting ended, quorum and approval both held
    Approved,
    /// Voting ended, quorum or approval failed
    Rejected,
    /// Approved and the treasury debit was made
    Executed,
}

impl ProposalStatus {
    /// Check if the proposal is in its voting period.
    pub fn is_active(&self) -> bool {
        matches!(self, ProposalStatus::Active)
    }

    /// Check if the proposal can be executed.
    pub fn is_executable(&self) -> bool {
        matches!(self, ProposalStatus::Approved)
    }

    /// Check if the proposal has reached a terminal state.
    pub fn is_final(&self) -> bool {
        matches!(self, ProposalStatus::Rejected | ProposalStatus::Executed)
    }
}

/// A funding proposal.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Proposal {
    /// Dense id, assigned from 1
    pub id: u64,
    pub creator: MemberId,
    pub title: Title,
    pub description: Description,
    pub link: Option<Link>,
    /// Amount debited from the treasury on execution
    pub funds_requested: u128,
    pub beneficiary: MemberId,
    pub impact_metrics: ImpactMetrics,
    pub created_at: Tick,
    /// Last tick at which a vote may still be cast
    pub expires_at: Tick,
    /// Set exactly once, on the Approved -> Executed edge
    pub executed_at: Option<Tick>,
    pub status: ProposalStatus,
    /// Sum of yes-vote weights
    pub yes_votes: u128,
    /// Sum of no-vote weights
    pub no_votes: u128,
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        creator: MemberId,
        title: Title,
        description: Description,
        link: Option<Link>,
        funds_requested: u128,
        beneficiary: MemberId,
        impact_metrics: ImpactMetrics,
        created_at: Tick,
        duration: u64,
    ) -> Self {
        Self {
            id,
            creator,
            title,
            description,
            link,
            funds_requested,
            beneficiary,
            impact_metrics,
            created_at,
            expires_at: created_at.saturating_add(duration),
            executed_at: None,
            status: ProposalStatus::Active,
            yes_votes: 0,
            no_votes: 0,
        }
    }

    /// Total vote weight cast so far.
    pub fn total_votes(&self) -> u128 {
        self.yes_votes.saturating_add(self.no_votes)
    }

    /// Check if voting is still open at the given tick.
    pub fn voting_open(&self, now: Tick) -> bool {
        self.status.is_active() && now <= self.expires_at
    }

    /// Add a vote weight to the matching tally.
    pub fn apply_vote(&mut self, approve: bool, weight: u128) {
        if approve {
            self.yes_votes = self.yes_votes.saturating_add(weight);
        } else {
            self.no_votes = self.no_votes.saturating_add(weight);
        }
    }

    /// Quorum test: votes cast must reach the configured share of total
    /// stake. Integer floor division, no rounding adjustment.
    pub fn quorum_reached(&self, total_stake: u128, quorum_pct: u8) -> bool {
        let required = total_stake.saturating_mul(quorum_pct as u128) / 100;
        self.total_votes() >= required
    }

    /// Approval test: yes-share of votes cast must reach the configured
    /// percentage. Zero votes cast fails by construction.
    pub fn approval_reached(&self, approval_pct: u8) -> bool {
        let total = self.total_votes();
        if total == 0 {
            return false;
        }
        let yes_pct = self.yes_votes.saturating_mul(100) / total;
        yes_pct >= approval_pct as u128
    }

    /// Commit the voting outcome after expiry.
    ///
    /// The only path by which an Active proposal changes state. Voting past
    /// expiry is already blocked at cast time, so this is purely a
    /// status-commit step; repeat calls fail because the status is no
    /// longer Active.
    pub fn close(
        &mut self,
        now: Tick,
        total_stake: u128,
        quorum_pct: u8,
        approval_pct: u8,
    ) -> Result<ProposalStatus, GovernanceError> {
        if !self.status.is_active() {
            return Err(GovernanceError::ProposalExecuted);
        }
        if now < self.expires_at {
            return Err(GovernanceError::VotingPeriodActive);
        }

        self.status = if self.quorum_reached(total_stake, quorum_pct)
            && self.approval_reached(approval_pct)
        {
            ProposalStatus::Approved
        } else {
            ProposalStatus::Rejected
        };

        Ok(self.status)
    }

    /// Transition Approved -> Executed, stamping the execution tick.
    ///
    /// The treasury debit is the caller's responsibility and must land in
    /// the same atomic commit as this record.
    pub fn mark_executed(&mut self, now: Tick) -> Result<(), GovernanceError> {
        match self.status {
            ProposalStatus::Executed => return Err(GovernanceError::ProposalExecuted),
            ProposalStatus::Approved => {}
            _ => return Err(GovernanceError::ProposalExpired),
        }
        if self.executed_at.is_some() {
            return Err(GovernanceError::ProposalExecuted);
        }

        self.status = ProposalStatus::Executed;
        self.executed_at = Some(now);
        Ok(())
    }
}

/// Typed view over the proposals column family and the id counter.
pub struct ProposalStore {
    db: Arc<Database>,
}

impl ProposalStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn key(id: u64) -> [u8; 8] {
        // Big-endian so scan order matches id order
        id.to_be_bytes()
    }

    /// Get a proposal record.
    pub fn get(&self, id: u64) -> Result<Option<Proposal>, GovernanceError> {
        match self.db.get(ColumnFamily::Proposals, &Self::key(id))? {
            Some(bytes) => Ok(Some(meta::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Next id to assign. Ids are a dense sequence starting at 1.
    pub fn next_id(&self) -> Result<u64, GovernanceError> {
        Ok(meta::counter(&self.db, meta::NEXT_PROPOSAL_ID, 1u64)?)
    }

    /// Number of proposals created so far.
    pub fn count(&self) -> Result<u64, GovernanceError> {
        Ok(self.next_id()? - 1)
    }

    /// All proposals in id order.
    pub fn all(&self) -> Result<Vec<Proposal>, GovernanceError> {
        let mut proposals = Vec::new();
        for (_key, bytes) in self.db.scan(ColumnFamily::Proposals)? {
            proposals.push(meta::decode(&bytes)?);
        }
        Ok(proposals)
    }

    /// Proposals currently in the given status.
    pub fn by_status(&self, status: ProposalStatus) -> Result<Vec<Proposal>, GovernanceError> {
        let mut proposals = self.all()?;
        proposals.retain(|p| p.status == status);
        Ok(proposals)
    }

    /// Stage a proposal record write into a batch.
    pub fn stage_put(
        &self,
        batch: &mut WriteBatch,
        proposal: &Proposal,
    ) -> Result<(), GovernanceError> {
        batch.put(
            ColumnFamily::Proposals,
            &Self::key(proposal.id),
            &meta::encode(proposal)?,
        )?;
        Ok(())
    }

    pub fn stage_next_id(&self, batch: &mut WriteBatch, next: u64) -> Result<(), GovernanceError> {
        meta::stage_counter(batch, meta::NEXT_PROPOSAL_ID, &next)?;
        Ok(())
    }
}
