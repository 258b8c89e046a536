//! End-to-end lifecycle tests: join, fund, propose, vote, finalize,
//! execute, against a real on-disk database.

use agora_governance::{Dao, GovernanceError, ProposalStatus};
use agora_types::MemberId;
use tempfile::TempDir;

fn id(byte: u8) -> MemberId {
    MemberId::from_bytes([byte; 20])
}

fn open_dao() -> (Dao, TempDir) {
    let temp = TempDir::new().unwrap();
    let dao = Dao::open(temp.path(), id(0xad)).unwrap();
    (dao, temp)
}

/// Scenarios A-C: creation against a pre-funded treasury, a vote that
/// misses quorum, and rejection at finalize.
#[test]
fn proposal_rejected_when_quorum_unmet() {
    let (dao, _temp) = open_dao();
    dao.deposit_to_treasury(50).unwrap();

    // A: member with stake 100 creates proposal 1 requesting 10
    dao.join(id(1), 100, 1).unwrap();
    let pid = dao
        .create_proposal(
            id(1),
            "Community garden",
            "Plant a shared garden",
            None,
            10,
            id(1),
            "Twenty plots",
            1,
        )
        .unwrap();
    assert_eq!(pid, 1);

    // B: second member with stake 20 votes yes; total stake pool is 120,
    // quorum 30% needs floor(120 * 30 / 100) = 36 weight, one 20-weight
    // vote is short
    dao.join(id(2), 20, 2).unwrap();
    dao.vote(id(2), pid, true, 3).unwrap();

    let proposal = dao.proposal(pid).unwrap().unwrap();
    assert_eq!(proposal.yes_votes, 20);
    assert!(!proposal.quorum_reached(120, 30));

    // C: finalize at expiry -> Rejected
    let expires_at = proposal.expires_at;
    let status = dao.finalize_proposal(pid, expires_at).unwrap();
    assert_eq!(status, ProposalStatus::Rejected);
    assert_eq!(dao.proposal_status(pid).unwrap(), Some(ProposalStatus::Rejected));

    // Rejected is terminal
    assert_eq!(
        dao.execute_proposal(pid, id(1), expires_at + 1),
        Err(GovernanceError::ProposalExpired)
    );
}

/// Scenario D: full happy path through execution, with the double-execute
/// guard.
#[test]
fn approved_proposal_executes_exactly_once() {
    let (dao, _temp) = open_dao();
    dao.deposit_to_treasury(50).unwrap();
    dao.join(id(1), 100, 1).unwrap();

    let pid = dao
        .create_proposal(id(1), "Repair fund", "Fix the roof", None, 10, id(2), "One roof", 1)
        .unwrap();
    let expires_at = dao.proposal(pid).unwrap().unwrap().expires_at;

    // Single voter holds all stake: quorum 30% and approval 50% both pass
    dao.vote(id(1), pid, true, 2).unwrap();

    // Cannot finalize while the voting period runs
    assert_eq!(
        dao.finalize_proposal(pid, expires_at - 1),
        Err(GovernanceError::VotingPeriodActive)
    );

    let status = dao.finalize_proposal(pid, expires_at).unwrap();
    assert_eq!(status, ProposalStatus::Approved);

    // Finalize is a one-shot transition
    assert_eq!(
        dao.finalize_proposal(pid, expires_at + 1),
        Err(GovernanceError::ProposalExecuted)
    );

    dao.execute_proposal(pid, id(1), expires_at + 5).unwrap();

    let proposal = dao.proposal(pid).unwrap().unwrap();
    assert_eq!(proposal.status, ProposalStatus::Executed);
    assert_eq!(proposal.executed_at, Some(expires_at + 5));
    assert_eq!(dao.dao_info().unwrap().treasury_balance, 40);

    // Second execute fails and debits nothing further
    assert_eq!(
        dao.execute_proposal(pid, id(1), expires_at + 6),
        Err(GovernanceError::ProposalExecuted)
    );
    assert_eq!(dao.dao_info().unwrap().treasury_balance, 40);
}

/// Scenario E: voting after expiry fails even though the status is still
/// Active.
#[test]
fn vote_after_expiry_fails() {
    let (dao, _temp) = open_dao();
    dao.join(id(1), 100, 1).unwrap();

    let pid = dao
        .create_proposal(id(1), "t", "d", None, 0, id(2), "m", 1)
        .unwrap();
    let expires_at = dao.proposal(pid).unwrap().unwrap().expires_at;

    assert_eq!(dao.proposal_status(pid).unwrap(), Some(ProposalStatus::Active));
    assert_eq!(
        dao.vote(id(1), pid, true, expires_at + 1),
        Err(GovernanceError::ProposalExpired)
    );
}

/// Execution re-checks the treasury: approval alone does not reserve
/// funds.
#[test]
fn execute_fails_when_treasury_shrank() {
    let (dao, _temp) = open_dao();
    dao.deposit_to_treasury(100).unwrap();
    dao.join(id(1), 100, 1).unwrap();

    // Two proposals each requesting most of the pot
    let first = dao
        .create_proposal(id(1), "a", "d", None, 80, id(2), "m", 1)
        .unwrap();
    let second = dao
        .create_proposal(id(1), "b", "d", None, 80, id(3), "m", 1)
        .unwrap();

    dao.vote(id(1), first, true, 2).unwrap();
    dao.vote(id(1), second, true, 2).unwrap();

    let expires_at = dao.proposal(first).unwrap().unwrap().expires_at;
    assert_eq!(dao.finalize_proposal(first, expires_at).unwrap(), ProposalStatus::Approved);
    assert_eq!(dao.finalize_proposal(second, expires_at).unwrap(), ProposalStatus::Approved);

    dao.execute_proposal(first, id(1), expires_at + 1).unwrap();
    assert_eq!(
        dao.execute_proposal(second, id(1), expires_at + 1),
        Err(GovernanceError::TreasuryInsufficientFunds {
            requested: 80,
            available: 20,
        })
    );

    // The failed execution left the second proposal executable
    assert_eq!(dao.proposal_status(second).unwrap(), Some(ProposalStatus::Approved));
    assert_eq!(dao.dao_info().unwrap().treasury_balance, 20);

    // Top up and retry
    dao.deposit_to_treasury(60).unwrap();
    dao.execute_proposal(second, id(1), expires_at + 2).unwrap();
    assert_eq!(dao.dao_info().unwrap().treasury_balance, 0);
}

/// Execution is open to any member, and only to members.
#[test]
fn any_member_may_execute() {
    let (dao, _temp) = open_dao();
    dao.deposit_to_treasury(50).unwrap();
    dao.join(id(1), 100, 1).unwrap();
    dao.join(id(2), 5, 1).unwrap();

    let pid = dao
        .create_proposal(id(1), "t", "d", None, 10, id(3), "m", 1)
        .unwrap();
    dao.vote(id(1), pid, true, 2).unwrap();
    let expires_at = dao.proposal(pid).unwrap().unwrap().expires_at;
    dao.finalize_proposal(pid, expires_at).unwrap();

    // A stranger cannot trigger execution
    assert_eq!(
        dao.execute_proposal(pid, id(9), expires_at + 1),
        Err(GovernanceError::NotMember)
    );
    // An unrelated member can
    dao.execute_proposal(pid, id(2), expires_at + 1).unwrap();
}

/// Tally invariant: yes + no always equals the sum of stored vote weights.
#[test]
fn tallies_match_vote_records() {
    let (dao, _temp) = open_dao();
    dao.join(id(1), 100, 1).unwrap();
    dao.join(id(2), 30, 1).unwrap();
    dao.join(id(3), 7, 1).unwrap();

    let pid = dao
        .create_proposal(id(1), "t", "d", None, 0, id(4), "m", 1)
        .unwrap();

    dao.vote(id(1), pid, true, 2).unwrap();
    dao.vote(id(2), pid, false, 2).unwrap();
    dao.vote(id(3), pid, true, 3).unwrap();

    let proposal = dao.proposal(pid).unwrap().unwrap();
    let votes = dao.votes_for_proposal(pid).unwrap();

    assert_eq!(votes.len(), 3);
    let weight_sum: u128 = votes.iter().map(|v| v.weight).sum();
    assert_eq!(proposal.total_votes(), weight_sum);
    assert_eq!(proposal.yes_votes, 107);
    assert_eq!(proposal.no_votes, 30);
}

/// Everything survives closing and reopening the database.
#[test]
fn state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let expires_at;

    {
        let dao = Dao::open(temp.path(), id(0xad)).unwrap();
        dao.deposit_to_treasury(50).unwrap();
        dao.join(id(1), 100, 1).unwrap();
        let pid = dao
            .create_proposal(id(1), "t", "d", None, 10, id(2), "m", 1)
            .unwrap();
        dao.vote(id(1), pid, true, 2).unwrap();
        expires_at = dao.proposal(pid).unwrap().unwrap().expires_at;
    }

    let dao = Dao::open(temp.path(), id(0xad)).unwrap();

    let info = dao.dao_info().unwrap();
    assert_eq!(info.total_stake, 100);
    assert_eq!(info.member_count, 1);
    assert_eq!(info.proposal_count, 1);
    assert_eq!(info.treasury_balance, 50);

    // The reloaded proposal finalizes and executes normally
    assert_eq!(dao.finalize_proposal(1, expires_at).unwrap(), ProposalStatus::Approved);
    dao.execute_proposal(1, id(1), expires_at + 1).unwrap();
    assert_eq!(dao.dao_info().unwrap().treasury_balance, 40);
}
