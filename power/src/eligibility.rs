//! Eligibility derivation: who may propose, who may vote.
//!
//! A space lookup answers "may this account create a proposal": members
//! (admins, moderators, members) always may; everyone else needs
//! proposal-validation power of at least the space's threshold. A proposal
//! lookup answers "may this account vote": any strategy with a positive
//! balance is enough. A member's space lookup also reports `can_vote` from
//! its voting results, since no validation call replaces them.

use vp_types::{Address, GovernanceItem, NormalizedTotal, Space, TypesError, VotingPowerResult};

/// The two booleans the UI gates on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub can_propose: bool,
    pub can_vote: bool,
}

/// Everything eligibility depends on besides the gateway results.
#[derive(Clone, Copy, Debug)]
pub struct EligibilitySource<'a> {
    item: &'a GovernanceItem,
    is_member: bool,
}

impl<'a> EligibilitySource<'a> {
    pub fn new(item: &'a GovernanceItem, account: &Address) -> Self {
        let is_member = item
            .as_space()
            .is_some_and(|space| space.is_member(account));
        Self { item, is_member }
    }

    pub fn item(&self) -> &'a GovernanceItem {
        self.item
    }

    /// The space, when this is a proposal-creation lookup.
    pub fn space(&self) -> Option<&'a Space> {
        self.item.as_space()
    }

    pub fn is_member(&self) -> bool {
        self.is_member
    }

    /// Whether the proposal-validation strategies must be evaluated.
    pub fn needs_propose_call(&self) -> bool {
        self.item.is_space_level() && !self.is_member
    }

    /// Eligibility before any result is known.
    pub fn initial(&self) -> Eligibility {
        Eligibility {
            can_propose: self.is_member,
            can_vote: false,
        }
    }

    /// Derive eligibility from the voting results and, when the propose call
    /// ran, its results.
    pub fn derive(
        &self,
        voting: &[VotingPowerResult],
        propose: Option<&[VotingPowerResult]>,
    ) -> Result<Eligibility, TypesError> {
        match self.item {
            GovernanceItem::Space(space) => match propose {
                Some(results) => {
                    let total = propose_total(results)?;
                    let meets = total.meets(&space.proposal_threshold)?;
                    tracing::debug!(
                        space = %space.id,
                        total = %total,
                        threshold = %space.proposal_threshold,
                        meets,
                        "proposal validation power"
                    );
                    Ok(Eligibility {
                        can_propose: meets,
                        can_vote: false,
                    })
                }
                // Members skip validation; their voting results decide can_vote.
                None => Ok(Eligibility {
                    can_propose: self.is_member,
                    can_vote: any_positive(voting),
                }),
            },
            GovernanceItem::Proposal(_) => Ok(Eligibility {
                can_propose: false,
                can_vote: any_positive(voting),
            }),
        }
    }
}

fn any_positive(results: &[VotingPowerResult]) -> bool {
    results.iter().any(VotingPowerResult::is_positive)
}

/// Sum of `value / 10^cumulative_decimals` over the results.
pub fn propose_total(results: &[VotingPowerResult]) -> Result<NormalizedTotal, TypesError> {
    NormalizedTotal::from_terms(results.iter().map(|r| (&r.value, r.cumulative_decimals)))
}
