//! Agora Governance - stake-weighted proposal governance over a durable
//! ledger.
//!
//! This crate provides:
//! - A membership roll weighted by fungible stake
//! - Funding proposals with time-boxed quorum/approval voting
//! - A shared treasury gated behind the voting outcome
//! - The proposal lifecycle state machine tying them together

pub mod config;
pub mod dao;
pub mod error;
pub mod member;
pub mod proposal;
pub mod treasury;
pub mod vote;

mod meta;

pub use config::DaoConfig;
pub use dao::{Dao, DaoInfo};
pub use error::GovernanceError;
pub use member::Member;
pub use proposal::{Proposal, ProposalStatus};
pub use vote::Vote;
