//! The Dao orchestrator: public entry points over the four durable maps.
//!
//! Every mutating operation validates all of its preconditions against
//! committed state, stages its writes into one batch, and commits the
//! batch atomically; the first failing precondition aborts with zero side
//! effects. A single write lock serializes mutators so that two votes or
//! two executions racing on the same proposal cannot both succeed.
//! Read-only queries go to committed state without the lock and never
//! fail on absent keys.

use crate::config::{ConfigStore, DaoConfig};
use crate::error::GovernanceError;
use crate::member::{Member, MembershipRegistry};
use crate::proposal::{Proposal, ProposalStatus, ProposalStore};
use crate::treasury::Treasury;
use crate::vote::{Vote, VoteLedger};
use agora_storage::{ColumnFamily, Database, DatabaseConfig, StorageError};
use agora_types::{Description, ImpactMetrics, Link, MemberId, Tick, Title};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Summary of the ledger's current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoInfo {
    pub config: DaoConfig,
    pub total_stake: u128,
    pub member_count: u64,
    pub proposal_count: u64,
    pub treasury_balance: u128,
}

/// The governance ledger.
pub struct Dao {
    db: Arc<Database>,
    config: ConfigStore,
    members: MembershipRegistry,
    proposals: ProposalStore,
    votes: VoteLedger,
    treasury: Treasury,
    write_lock: Mutex<()>,
}

impl Dao {
    /// Open (or create) a ledger at the given path.
    ///
    /// On first open the genesis config is written with `admin` as the
    /// admin identity; on reopen the stored config wins and `admin` is
    /// ignored.
    pub fn open(path: &Path, admin: MemberId) -> Result<Self, GovernanceError> {
        Self::open_with(path, admin, &DatabaseConfig::default())
    }

    /// Open with explicit database tuning.
    pub fn open_with(
        path: &Path,
        admin: MemberId,
        db_config: &DatabaseConfig,
    ) -> Result<Self, GovernanceError> {
        let db = Arc::new(Database::open(path, db_config)?);

        let dao = Self {
            config: ConfigStore::new(db.clone()),
            members: MembershipRegistry::new(db.clone()),
            proposals: ProposalStore::new(db.clone()),
            votes: VoteLedger::new(db.clone()),
            treasury: Treasury::new(db.clone()),
            write_lock: Mutex::new(()),
            db,
        };

        if dao.config.get()?.is_none() {
            let genesis = DaoConfig::new(admin);
            let mut batch = dao.db.new_write_batch();
            dao.config.stage_put(&mut batch, &genesis)?;
            dao.db.batch_write(batch)?;
            tracing::info!(admin = %admin, "initialized governance ledger");
        }

        Ok(dao)
    }

    // --- Mutating entry points -------------------------------------------

    /// Register `caller` as a member with the given stake.
    pub fn join(&self, caller: MemberId, stake: u128, now: Tick) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        if stake == 0 {
            return Err(GovernanceError::InvalidParameter(
                "stake must be positive".to_string(),
            ));
        }
        if self.members.is_member(&caller)? {
            return Err(GovernanceError::AlreadyMember);
        }

        let total_stake = self.members.total_stake()?.checked_add(stake).ok_or_else(|| {
            GovernanceError::InvalidParameter("total stake overflow".to_string())
        })?;
        let member_count = self.members.member_count()? + 1;

        let mut batch = self.db.new_write_batch();
        self.members
            .stage_put(&mut batch, &Member::new(caller, stake, now))?;
        self.members.stage_total_stake(&mut batch, total_stake)?;
        self.members.stage_member_count(&mut batch, member_count)?;
        self.db.batch_write(batch)?;

        tracing::info!(member = %caller, stake, "member joined");
        Ok(())
    }

    /// Create a funding proposal. Returns the new proposal id.
    ///
    /// The treasury check here is an early guard; execution re-checks it
    /// because the balance may change in between.
    #[allow(clippy::too_many_arguments)]
    pub fn create_proposal(
        &self,
        caller: MemberId,
        title: &str,
        description: &str,
        link: Option<&str>,
        funds_requested: u128,
        beneficiary: MemberId,
        impact_metrics: &str,
        now: Tick,
    ) -> Result<u64, GovernanceError> {
        let _guard = self.write_lock.lock();

        let mut creator = self.members.get(&caller)?.ok_or(GovernanceError::NotMember)?;

        let title = Title::new(title)?;
        let description = Description::new(description)?;
        let link = link.map(Link::new).transpose()?;
        let impact_metrics = ImpactMetrics::new(impact_metrics)?;

        let available = self.treasury.balance()?;
        if funds_requested > available {
            return Err(GovernanceError::TreasuryInsufficientFunds {
                requested: funds_requested,
                available,
            });
        }

        let config = self.config.load()?;
        let id = self.proposals.next_id()?;
        let proposal = Proposal::new(
            id,
            caller,
            title,
            description,
            link,
            funds_requested,
            beneficiary,
            impact_metrics,
            now,
            config.proposal_duration,
        );
        creator.proposals_created += 1;

        let mut batch = self.db.new_write_batch();
        self.proposals.stage_put(&mut batch, &proposal)?;
        self.proposals.stage_next_id(&mut batch, id + 1)?;
        self.members.stage_put(&mut batch, &creator)?;
        self.db.batch_write(batch)?;

        tracing::info!(
            proposal = id,
            creator = %caller,
            funds = funds_requested,
            expires_at = proposal.expires_at,
            "proposal created"
        );
        Ok(id)
    }

    /// Cast a yes/no vote, weighted by the caller's stake at cast time.
    pub fn vote(
        &self,
        caller: MemberId,
        proposal_id: u64,
        approve: bool,
        now: Tick,
    ) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        // Precondition order is part of the contract: first failure wins.
        let mut voter = self.members.get(&caller)?.ok_or(GovernanceError::NotMember)?;
        if voter.stake == 0 {
            return Err(GovernanceError::InsufficientBalance);
        }
        let mut proposal = self
            .proposals
            .get(proposal_id)?
            .ok_or(GovernanceError::ProposalDoesntExist(proposal_id))?;
        if !proposal.voting_open(now) {
            return Err(GovernanceError::ProposalExpired);
        }
        if self.votes.has_voted(proposal_id, &caller)? {
            return Err(GovernanceError::AlreadyVoted);
        }

        let weight = voter.stake;
        let vote = Vote::new(proposal_id, caller, approve, weight, now);
        proposal.apply_vote(approve, weight);
        voter.votes_cast += 1;

        let mut batch = self.db.new_write_batch();
        self.votes.stage_insert(&mut batch, &vote)?;
        self.proposals.stage_put(&mut batch, &proposal)?;
        self.members.stage_put(&mut batch, &voter)?;
        self.db.batch_write(batch)?;

        tracing::debug!(proposal = proposal_id, voter = %caller, approve, weight, "vote cast");
        Ok(())
    }

    /// Commit the voting outcome of an expired proposal.
    pub fn finalize_proposal(
        &self,
        proposal_id: u64,
        now: Tick,
    ) -> Result<ProposalStatus, GovernanceError> {
        let _guard = self.write_lock.lock();

        let mut proposal = self
            .proposals
            .get(proposal_id)?
            .ok_or(GovernanceError::ProposalDoesntExist(proposal_id))?;

        let config = self.config.load()?;
        let total_stake = self.members.total_stake()?;
        let status = proposal.close(
            now,
            total_stake,
            config.quorum_threshold_pct,
            config.approval_threshold_pct,
        )?;

        let mut batch = self.db.new_write_batch();
        self.proposals.stage_put(&mut batch, &proposal)?;
        self.db.batch_write(batch)?;

        tracing::info!(proposal = proposal_id, ?status, "proposal finalized");
        Ok(status)
    }

    /// Execute an approved proposal, debiting the treasury.
    ///
    /// Any member may trigger execution; the call is deliberately not
    /// admin-gated. No transfer to the beneficiary happens here.
    pub fn execute_proposal(
        &self,
        proposal_id: u64,
        caller: MemberId,
        now: Tick,
    ) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        if !self.members.is_member(&caller)? {
            return Err(GovernanceError::NotMember);
        }
        let mut proposal = self
            .proposals
            .get(proposal_id)?
            .ok_or(GovernanceError::ProposalDoesntExist(proposal_id))?;

        proposal.mark_executed(now)?;
        // Re-check: the treasury may have shrunk since creation/approval.
        let balance = self.treasury.checked_debit(proposal.funds_requested)?;

        let mut batch = self.db.new_write_batch();
        self.proposals.stage_put(&mut batch, &proposal)?;
        self.treasury.stage_balance(&mut batch, balance)?;
        self.db.batch_write(batch)?;

        tracing::info!(
            proposal = proposal_id,
            amount = proposal.funds_requested,
            beneficiary = %proposal.beneficiary,
            "proposal executed"
        );
        Ok(())
    }

    /// Record a deposit into the shared treasury.
    pub fn deposit_to_treasury(&self, amount: u128) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        let balance = self.treasury.checked_deposit(amount)?;

        let mut batch = self.db.new_write_batch();
        self.treasury.stage_balance(&mut batch, balance)?;
        self.db.batch_write(batch)?;

        tracing::info!(amount, balance, "treasury deposit");
        Ok(())
    }

    /// Update governance parameters. Only provided fields change; a bad
    /// value leaves the whole config untouched.
    pub fn update_parameters(
        &self,
        caller: MemberId,
        duration: Option<u64>,
        quorum_pct: Option<u8>,
        approval_pct: Option<u8>,
    ) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        let mut config = self.config.load()?;
        if caller != config.admin {
            return Err(GovernanceError::NotAdmin);
        }
        for pct in [quorum_pct, approval_pct].into_iter().flatten() {
            if pct > 100 {
                return Err(GovernanceError::InvalidParameter(format!(
                    "percentage out of range: {pct}"
                )));
            }
        }

        if let Some(duration) = duration {
            config.proposal_duration = duration;
        }
        if let Some(quorum) = quorum_pct {
            config.quorum_threshold_pct = quorum;
        }
        if let Some(approval) = approval_pct {
            config.approval_threshold_pct = approval;
        }

        let mut batch = self.db.new_write_batch();
        self.config.stage_put(&mut batch, &config)?;
        self.db.batch_write(batch)?;

        tracing::info!(
            duration = config.proposal_duration,
            quorum_pct = config.quorum_threshold_pct,
            approval_pct = config.approval_threshold_pct,
            "parameters updated"
        );
        Ok(())
    }

    /// Hand the admin role to another identity.
    pub fn transfer_admin(
        &self,
        caller: MemberId,
        new_admin: MemberId,
    ) -> Result<(), GovernanceError> {
        let _guard = self.write_lock.lock();

        let mut config = self.config.load()?;
        if caller != config.admin {
            return Err(GovernanceError::NotAdmin);
        }
        config.admin = new_admin;

        let mut batch = self.db.new_write_batch();
        self.config.stage_put(&mut batch, &config)?;
        self.db.batch_write(batch)?;

        tracing::info!(old = %caller, new = %new_admin, "admin transferred");
        Ok(())
    }

    // --- Read-only queries -----------------------------------------------

    /// Summary of config, stake, counts, and treasury balance, read from
    /// one consistent snapshot.
    pub fn dao_info(&self) -> Result<DaoInfo, GovernanceError> {
        let snapshot = self.db.snapshot();

        let config = match snapshot.get(ColumnFamily::Meta, crate::meta::CONFIG)? {
            Some(bytes) => crate::meta::decode(&bytes)?,
            None => {
                return Err(GovernanceError::Storage(StorageError::Deserialization(
                    "missing config record".to_string(),
                )))
            }
        };
        let next_id = crate::meta::counter_at(&snapshot, crate::meta::NEXT_PROPOSAL_ID, 1u64)?;

        Ok(DaoInfo {
            config,
            total_stake: crate::meta::counter_at(&snapshot, crate::meta::TOTAL_STAKE, 0u128)?,
            member_count: crate::meta::counter_at(&snapshot, crate::meta::MEMBER_COUNT, 0u64)?,
            proposal_count: next_id - 1,
            treasury_balance: crate::meta::counter_at(
                &snapshot,
                crate::meta::TREASURY_BALANCE,
                0u128,
            )?,
        })
    }

    pub fn member(&self, id: &MemberId) -> Result<Option<Member>, GovernanceError> {
        self.members.get(id)
    }

    pub fn proposal(&self, id: u64) -> Result<Option<Proposal>, GovernanceError> {
        self.proposals.get(id)
    }

    pub fn proposal_status(&self, id: u64) -> Result<Option<ProposalStatus>, GovernanceError> {
        Ok(self.proposals.get(id)?.map(|p| p.status))
    }

    pub fn vote_record(
        &self,
        proposal_id: u64,
        voter: &MemberId,
    ) -> Result<Option<Vote>, GovernanceError> {
        self.votes.get(proposal_id, voter)
    }

    /// All proposals in id order.
    pub fn proposals(&self) -> Result<Vec<Proposal>, GovernanceError> {
        self.proposals.all()
    }

    pub fn proposals_by_status(
        &self,
        status: ProposalStatus,
    ) -> Result<Vec<Proposal>, GovernanceError> {
        self.proposals.by_status(status)
    }

    /// All votes cast on one proposal.
    pub fn votes_for_proposal(&self, proposal_id: u64) -> Result<Vec<Vote>, GovernanceError> {
        self.votes.for_proposal(proposal_id)
    }
}
