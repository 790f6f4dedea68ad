//! Voting-power fetch-and-cache coordinator.
//!
//! Answers two questions for the connected account, per governance item and
//! block: may it create a proposal in a space, and may it vote on a
//! proposal. The [`FetchCoordinator`]:
//! - keeps one status-tracked entry per `(kind, space, block)` key
//! - runs at most one fetch per key, later callers wait for it
//! - fans out to the network gateway (voting strategies, plus the
//!   proposal-validation strategies for non-member space lookups)
//! - derives eligibility exactly, without floating point
//! - drops everything when the [`AccountWatcher`] sees the account change

pub mod account;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod eligibility;
pub mod entry;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod tracing_spans;

mod inflight;

pub use account::{should_reset, AccountWatcher};
pub use cache::VotingPowerCache;
pub use config::{GatewayConfig, PowerConfig};
pub use coordinator::{FetchCoordinator, FetchOutcome};
pub use eligibility::{Eligibility, EligibilitySource};
pub use entry::{VotingPowerEntry, VotingPowerStatus};
pub use error::PowerError;
pub use logging::{init_logging, LogFormat};
pub use metrics::PowerMetrics;
