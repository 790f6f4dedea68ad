//! Governance items: spaces and the proposals that belong to them.

use serde::{Deserialize, Serialize};

use crate::strategy::StrategyView;
use crate::{Address, BlockTag, CacheKey, ItemKind, NetworkId, Power, StrategyMetadata, StrategySet};

/// A governance space: strategies, proposal threshold and membership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub network: NetworkId,
    pub snapshot_chain_id: String,
    #[serde(default)]
    pub voting_power_symbol: String,
    /// Whole units of validation power required to create a proposal.
    #[serde(default)]
    pub proposal_threshold: Power,
    /// Strategies used to compute voting power.
    #[serde(flatten)]
    pub voting: StrategySet,
    /// Strategies of the proposal-validation rule, summed against the
    /// threshold.
    #[serde(default)]
    pub proposal_validation: StrategySet,
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub moderators: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Space {
    /// Whether `account` is an admin, moderator or member of the space.
    ///
    /// Members may always create proposals, whatever their voting power.
    pub fn is_member(&self, account: &Address) -> bool {
        self.admins
            .iter()
            .chain(&self.moderators)
            .chain(&self.members)
            .any(|member| account.matches(member))
    }

    pub fn summary(&self) -> SpaceSummary {
        SpaceSummary {
            id: self.id.clone(),
            snapshot_chain_id: self.snapshot_chain_id.clone(),
            voting_power_symbol: self.voting_power_symbol.clone(),
            strategies_parsed_metadata: self.voting.parsed_metadata.clone(),
        }
    }
}

/// The parts of a space a proposal carries with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSummary {
    pub id: String,
    pub snapshot_chain_id: String,
    #[serde(default)]
    pub voting_power_symbol: String,
    #[serde(default)]
    pub strategies_parsed_metadata: Vec<StrategyMetadata>,
}

/// A proposal of a space, with its own voting strategies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub network: NetworkId,
    pub space: SpaceSummary,
    #[serde(default)]
    pub strategies: Vec<String>,
    #[serde(default)]
    pub strategies_params: Vec<String>,
    /// Block the proposal's voting power is snapshotted at.
    #[serde(default)]
    pub snapshot: Option<u64>,
}

/// What a voting-power lookup is about.
///
/// The variant decides which eligibility question is answered: a space
/// answers "may this account propose", a proposal "may this account vote".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GovernanceItem {
    Space(Space),
    Proposal(Proposal),
}

impl GovernanceItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Space(_) => ItemKind::Space,
            Self::Proposal(_) => ItemKind::Proposal,
        }
    }

    pub fn is_space_level(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    pub fn as_space(&self) -> Option<&Space> {
        match self {
            Self::Space(space) => Some(space),
            Self::Proposal(_) => None,
        }
    }

    /// Id of the space the item belongs to (the space itself for spaces).
    pub fn space_id(&self) -> &str {
        match self {
            Self::Space(space) => &space.id,
            Self::Proposal(proposal) => &proposal.space.id,
        }
    }

    pub fn network(&self) -> &NetworkId {
        match self {
            Self::Space(space) => &space.network,
            Self::Proposal(proposal) => &proposal.network,
        }
    }

    pub fn chain_id(&self) -> &str {
        match self {
            Self::Space(space) => &space.snapshot_chain_id,
            Self::Proposal(proposal) => &proposal.space.snapshot_chain_id,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Space(space) => &space.voting_power_symbol,
            Self::Proposal(proposal) => &proposal.space.voting_power_symbol,
        }
    }

    /// Strategies for the voting-power call.
    pub fn voting_strategies(&self) -> StrategyView<'_> {
        match self {
            Self::Space(space) => space.voting.view(),
            Self::Proposal(proposal) => StrategyView {
                strategies: &proposal.strategies,
                params: &proposal.strategies_params,
                metadata: &proposal.space.strategies_parsed_metadata,
            },
        }
    }

    /// The single cache key this item maps to at `block`.
    pub fn cache_key(&self, block: impl Into<BlockTag>) -> CacheKey {
        CacheKey::new(self.kind(), self.space_id(), block)
    }
}

impl From<Space> for GovernanceItem {
    fn from(space: Space) -> Self {
        Self::Space(space)
    }
}

impl From<Proposal> for GovernanceItem {
    fn from(proposal: Proposal) -> Self {
        Self::Proposal(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> Space {
        Space {
            id: "0xspace".into(),
            network: NetworkId::from("eth"),
            snapshot_chain_id: "1".into(),
            voting_power_symbol: "VP".into(),
            proposal_threshold: Power::from(1000u64),
            voting: StrategySet {
                strategies: vec!["0xerc20".into()],
                params: vec!["0x01".into()],
                parsed_metadata: vec![StrategyMetadata {
                    decimals: 18,
                    symbol: "VP".into(),
                    ..Default::default()
                }],
            },
            proposal_validation: StrategySet::default(),
            admins: vec!["0xAdmin".into()],
            moderators: vec!["".into(), "0xMod".into()],
            members: vec![],
        }
    }

    #[test]
    fn membership_is_case_insensitive_across_lists() {
        let space = space();
        assert!(space.is_member(&Address::new("0xadmin")));
        assert!(space.is_member(&Address::new("0XMOD")));
        assert!(!space.is_member(&Address::new("0xother")));
        assert!(!space.is_member(&Address::empty()));
    }

    #[test]
    fn proposal_keys_on_parent_space_with_own_kind() {
        let space = space();
        let proposal = Proposal {
            id: "7".into(),
            network: space.network.clone(),
            space: space.summary(),
            strategies: vec!["0xother".into()],
            strategies_params: vec![],
            snapshot: Some(100),
        };
        let space_item = GovernanceItem::from(space);
        let proposal_item = GovernanceItem::from(proposal);

        assert_eq!(space_item.cache_key(Some(100)).to_string(), "space:0xspace:100");
        assert_eq!(proposal_item.cache_key(Some(100)).to_string(), "proposal:0xspace:100");
        assert!(space_item.is_space_level());
        assert!(!proposal_item.is_space_level());
    }

    #[test]
    fn proposal_uses_own_strategies_with_space_metadata() {
        let space = space();
        let proposal = GovernanceItem::Proposal(Proposal {
            id: "7".into(),
            network: space.network.clone(),
            space: space.summary(),
            strategies: vec!["0xother".into()],
            strategies_params: vec!["0x02".into()],
            snapshot: None,
        });
        let view = proposal.voting_strategies();
        assert_eq!(view.strategies, ["0xother".to_string()]);
        assert_eq!(view.params, ["0x02".to_string()]);
        assert_eq!(view.metadata[0].decimals, 18);
    }

    #[test]
    fn deserializes_tagged_space() {
        let json = r#"{
            "type": "space",
            "id": "0xspace",
            "network": "sep",
            "snapshot_chain_id": "11155111",
            "voting_power_symbol": "VP",
            "proposal_threshold": "1000",
            "strategies": ["0xerc20"],
            "strategies_params": ["0x01"],
            "strategies_parsed_metadata": [{"decimals": 18, "symbol": "VP"}],
            "proposal_validation": {
                "strategies": ["0xerc20"],
                "strategies_params": ["0x01"]
            },
            "members": ["0xMember"]
        }"#;
        let item: GovernanceItem = serde_json::from_str(json).unwrap();
        let space = item.as_space().unwrap();
        assert_eq!(space.proposal_threshold, Power::from(1000u64));
        assert_eq!(space.voting.strategies.len(), 1);
        assert_eq!(space.proposal_validation.params, vec!["0x01".to_string()]);
        assert!(space.is_member(&Address::new("0xmember")));
    }
}
