//! Cache entries: the state the UI renders for one key.

use serde::{Deserialize, Serialize};

use vp_gateway::VotingPowerDetailsError;
use vp_types::VotingPowerResult;

use crate::Eligibility;

/// Lifecycle of an entry. `Idle` is reported for keys with no entry yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingPowerStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Voting power of the current account for one cache key.
///
/// Only the coordinator builds or changes entries; readers get clones.
/// While a re-fetch runs the entry is `Loading` but keeps the previous
/// results and booleans.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VotingPowerEntry {
    status: VotingPowerStatus,
    results: Vec<VotingPowerResult>,
    symbol: String,
    error: Option<VotingPowerDetailsError>,
    can_propose: bool,
    can_vote: bool,
}

impl VotingPowerEntry {
    /// First sight of a key: nothing known yet beyond the defaults.
    pub(crate) fn loading(symbol: impl Into<String>, initial: Eligibility) -> Self {
        Self {
            status: VotingPowerStatus::Loading,
            results: Vec::new(),
            symbol: symbol.into(),
            error: None,
            can_propose: initial.can_propose,
            can_vote: initial.can_vote,
        }
    }

    pub(crate) fn succeeded(
        symbol: impl Into<String>,
        results: Vec<VotingPowerResult>,
        eligibility: Eligibility,
    ) -> Self {
        Self {
            status: VotingPowerStatus::Success,
            results,
            symbol: symbol.into(),
            error: None,
            can_propose: eligibility.can_propose,
            can_vote: eligibility.can_vote,
        }
    }

    /// A settled failure. `error` is set only for explainable failures.
    pub(crate) fn failed(
        symbol: impl Into<String>,
        initial: Eligibility,
        error: Option<VotingPowerDetailsError>,
    ) -> Self {
        Self {
            status: VotingPowerStatus::Error,
            results: Vec::new(),
            symbol: symbol.into(),
            error,
            can_propose: initial.can_propose,
            can_vote: initial.can_vote,
        }
    }

    pub(crate) fn mark_loading(&mut self) {
        self.status = VotingPowerStatus::Loading;
    }

    pub fn status(&self) -> VotingPowerStatus {
        self.status
    }

    pub fn results(&self) -> &[VotingPowerResult] {
        &self.results
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn error(&self) -> Option<&VotingPowerDetailsError> {
        self.error.as_ref()
    }

    pub fn can_propose(&self) -> bool {
        self.can_propose
    }

    pub fn can_vote(&self) -> bool {
        self.can_vote
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            VotingPowerStatus::Success | VotingPowerStatus::Error
        )
    }
}
