//! Account address as reported by the connected wallet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address (EVM `0x…` or Starknet felt), or empty when no wallet
/// is connected.
///
/// Wallets report the same account with different letter casing
/// (checksummed vs lowercase), so equality checks that matter for
/// eligibility go through [`Address::matches`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The disconnected-wallet address.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no account is present (blank strings count as empty).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Case-insensitive comparison against another address.
    ///
    /// Empty addresses never match anything, including each other.
    pub fn matches(&self, other: &str) -> bool {
        let other = other.trim();
        !self.is_empty() && !other.is_empty() && self.0.trim().eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_case() {
        let a = Address::new("0xAbCdEf0000000000000000000000000000000001");
        assert!(a.matches("0xabcdef0000000000000000000000000000000001"));
        assert!(a.matches("0XABCDEF0000000000000000000000000000000001"));
        assert!(!a.matches("0xabcdef0000000000000000000000000000000002"));
    }

    #[test]
    fn empty_never_matches() {
        assert!(!Address::empty().matches(""));
        assert!(!Address::new("0xa").matches(""));
        assert!(!Address::new("  ").matches("  "));
    }

    #[test]
    fn blank_is_empty() {
        assert!(Address::empty().is_empty());
        assert!(Address::new("   ").is_empty());
        assert!(!Address::new("0x1").is_empty());
    }
}
