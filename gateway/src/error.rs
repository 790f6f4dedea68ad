use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An explainable voting-power failure reported by the evaluator, e.g. a
/// strategy that cannot be computed for this account or block.
///
/// Kept on the cache entry so the UI can show the reason.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct VotingPowerDetailsError {
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl VotingPowerDetailsError {
    pub fn new(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("voting power details: {0}")]
    VotingPowerDetails(#[from] VotingPowerDetailsError),

    #[error("no gateway registered for network {0}")]
    UnsupportedNetwork(String),

    #[error("HTTP request to gateway failed: {0}")]
    RequestFailed(String),

    #[error("gateway unreachable: {0}")]
    Unreachable(String),

    #[error("invalid response from gateway: {0}")]
    InvalidResponse(String),

    #[error("gateway returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// The typed details, if this is an explainable failure.
    pub fn details(&self) -> Option<&VotingPowerDetailsError> {
        match self {
            Self::VotingPowerDetails(details) => Some(details),
            _ => None,
        }
    }
}
