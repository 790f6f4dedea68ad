//! Per-strategy voting-power results.

use serde::{Deserialize, Serialize};

use crate::Power;

/// Voting power contributed by one strategy for one account at one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPowerResult {
    /// Strategy address or name.
    #[serde(default)]
    pub address: String,
    /// Raw balance in the strategy's smallest unit.
    pub value: Power,
    /// Decimals of the underlying token.
    #[serde(default)]
    pub decimals: u32,
    /// Total decimals to divide `value` by to get whole units.
    #[serde(alias = "cumulativeDecimals")]
    pub cumulative_decimals: u32,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "chainId")]
    pub chain_id: Option<String>,
    #[serde(default, alias = "swapLink")]
    pub swap_link: Option<String>,
}

impl VotingPowerResult {
    /// A bare result with no display metadata.
    pub fn new(address: impl Into<String>, value: impl Into<Power>, cumulative_decimals: u32) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            decimals: cumulative_decimals,
            cumulative_decimals,
            token: None,
            symbol: String::new(),
            chain_id: None,
            swap_link: None,
        }
    }

    pub fn is_positive(&self) -> bool {
        !self.value.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case_wire_names() {
        let json = r#"{
            "address": "0x0000000000000000000000000000000000000001",
            "value": "1500000000000000000",
            "decimals": 18,
            "cumulativeDecimals": 18,
            "symbol": "VOTE",
            "chainId": "1"
        }"#;
        let result: VotingPowerResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.cumulative_decimals, 18);
        assert_eq!(result.chain_id.as_deref(), Some("1"));
        assert!(result.is_positive());
    }

    #[test]
    fn zero_value_is_not_positive() {
        assert!(!VotingPowerResult::new("s", 0u64, 0).is_positive());
    }
}
