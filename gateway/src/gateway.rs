//! The gateway trait and its call arguments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vp_types::strategy::StrategyView;
use vp_types::{Address, BlockTag, NetworkId, VotingPowerResult};

use crate::GatewayError;

/// Where to evaluate strategies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Block height, or the head for [`BlockTag::Latest`].
    pub at: BlockTag,
    /// Chain the space snapshots voting power on.
    pub chain_id: String,
}

/// One voting-power evaluation request.
#[derive(Clone, Copy, Debug)]
pub struct VotingPowerQuery<'a> {
    /// Governance space id.
    pub object_id: &'a str,
    /// Network the space lives on.
    pub network: &'a NetworkId,
    pub strategies: StrategyView<'a>,
    pub account: &'a Address,
    pub opts: &'a FetchOptions,
}

/// Evaluates voting-power strategies on one network.
///
/// Implementations return exactly one result per strategy, in strategy
/// order, or an error for the whole request.
#[async_trait]
pub trait NetworkGateway: Send + Sync {
    async fn get_voting_power(
        &self,
        query: VotingPowerQuery<'_>,
    ) -> Result<Vec<VotingPowerResult>, GatewayError>;
}
