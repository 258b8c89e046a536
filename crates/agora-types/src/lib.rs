//! Agora Types - Core type definitions for the AGORA governance ledger.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - Member identities (20-byte, Bech32m encoded)
//! - Bounded text fields (titles, descriptions, links, impact metrics)
//! - The logical clock tick

pub mod member_id;
pub mod text;
pub mod error;

mod serialization;

pub use member_id::MemberId;
pub use text::{BoundedText, Description, ImpactMetrics, Link, Title};
pub use error::TypesError;

/// Logical clock tick (block height or equivalent monotonic counter).
///
/// The ledger never advances the clock itself; callers supply the current
/// tick and the core only compares against it.
pub type Tick = u64;
