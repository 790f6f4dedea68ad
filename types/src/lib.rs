//! Shared types for voting-power lookups.
//!
//! This crate defines the values every other crate in the workspace passes
//! around: account addresses, block tags, cache keys, arbitrary-precision
//! power amounts, strategy descriptors, governance items, and per-strategy
//! voting-power results.

pub mod address;
pub mod block;
pub mod error;
pub mod item;
pub mod key;
pub mod network;
pub mod power;
pub mod result;
pub mod strategy;

pub use address::Address;
pub use block::BlockTag;
pub use error::TypesError;
pub use item::{GovernanceItem, Proposal, Space, SpaceSummary};
pub use key::{CacheKey, ItemKind};
pub use network::NetworkId;
pub use power::{NormalizedTotal, Power};
pub use result::VotingPowerResult;
pub use strategy::{StrategyMetadata, StrategySet};
