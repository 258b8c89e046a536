use agora_storage::StorageError;
use agora_types::TypesError;
use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every public entry point fails with exactly one of these kinds, before
/// any state is written; there are no partial mutations to unwind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Caller is not authorized")]
    NotAuthorized,

    #[error("Caller is not the admin")]
    NotAdmin,

    #[error("Caller is not a member")]
    NotMember,

    #[error("Identity is already a member")]
    AlreadyMember,

    #[error("Proposal not found: {0}")]
    ProposalDoesntExist(u64),

    #[error("Proposal is expired or not open for this action")]
    ProposalExpired,

    #[error("Voting period is still active")]
    VotingPeriodActive,

    #[error("Proposal already finalized or executed")]
    ProposalExecuted,

    #[error("Already voted on this proposal")]
    AlreadyVoted,

    #[error("Insufficient stake balance")]
    InsufficientBalance,

    #[error("Approval threshold not reached")]
    ThresholdNotReached,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Treasury has insufficient funds: requested {requested}, available {available}")]
    TreasuryInsufficientFunds { requested: u128, available: u128 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<TypesError> for GovernanceError {
    fn from(e: TypesError) -> Self {
        GovernanceError::InvalidParameter(e.to_string())
    }
}
