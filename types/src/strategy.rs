//! Strategy descriptors passed to network gateways.

use serde::{Deserialize, Serialize};

/// Parsed metadata of a single strategy, as indexed alongside the space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

/// An ordered list of strategies with one param blob and one metadata
/// record per strategy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySet {
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default, rename = "strategies_params")]
    pub params: Vec<String>,
    #[serde(default, rename = "strategies_parsed_metadata")]
    pub parsed_metadata: Vec<StrategyMetadata>,
}

impl StrategySet {
    pub fn view(&self) -> StrategyView<'_> {
        StrategyView {
            strategies: &self.strategies,
            params: &self.params,
            metadata: &self.parsed_metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Borrowed strategies, params and metadata for one gateway call.
///
/// Metadata may come from a different owner than the strategies (proposals
/// evaluate their own strategies against the space's parsed metadata).
#[derive(Clone, Copy, Debug)]
pub struct StrategyView<'a> {
    pub strategies: &'a [String],
    pub params: &'a [String],
    pub metadata: &'a [StrategyMetadata],
}
