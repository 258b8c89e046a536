//! Treasury: a single durable balance, deposited into freely and debited
//! only by proposal execution.

use crate::error::GovernanceError;
use crate::meta;
use agora_storage::{Database, WriteBatch};
use std::sync::Arc;

/// Typed view over the treasury balance singleton.
///
/// The balance is recorded, not transferred; moving the underlying asset
/// is outside the core.
pub struct Treasury {
    db: Arc<Database>,
}

impl Treasury {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Current balance. A never-funded treasury reads as zero.
    pub fn balance(&self) -> Result<u128, GovernanceError> {
        Ok(meta::counter(&self.db, meta::TREASURY_BALANCE, 0u128)?)
    }

    /// Balance after a deposit, validated but not yet committed.
    pub fn checked_deposit(&self, amount: u128) -> Result<u128, GovernanceError> {
        if amount == 0 {
            return Err(GovernanceError::InvalidParameter(
                "deposit amount must be positive".to_string(),
            ));
        }
        self.balance()?
            .checked_add(amount)
            .ok_or_else(|| GovernanceError::InvalidParameter("treasury balance overflow".to_string()))
    }

    /// Balance after a debit, validated but not yet committed. The balance
    /// can never go negative.
    pub fn checked_debit(&self, amount: u128) -> Result<u128, GovernanceError> {
        let balance = self.balance()?;
        balance
            .checked_sub(amount)
            .ok_or(GovernanceError::TreasuryInsufficientFunds {
                requested: amount,
                available: balance,
            })
    }

    pub fn stage_balance(&self, batch: &mut WriteBatch, balance: u128) -> Result<(), GovernanceError> {
        meta::stage_counter(batch, meta::TREASURY_BALANCE, &balance)?;
        Ok(())
    }
}
