//! Cache keys for voting-power entries.
//!
//! A key is `(kind, object id, block)` rendered as `"{kind}:{id}:{block}"`.
//! The kind keeps "can this account propose in the space" and "can this
//! account vote on a proposal of the space" apart even though both are
//! evaluated against the same space id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{BlockTag, TypesError};

/// Which eligibility question an entry answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Proposal-creation eligibility on a space.
    Space,
    /// Voting eligibility on a proposal.
    Proposal,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Proposal => "proposal",
        }
    }
}

impl FromStr for ItemKind {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "space" => Ok(Self::Space),
            "proposal" => Ok(Self::Proposal),
            other => Err(TypesError::InvalidItemKind(other.to_string())),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a single cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    kind: ItemKind,
    object_id: String,
    block: BlockTag,
}

impl CacheKey {
    pub fn new(kind: ItemKind, object_id: impl Into<String>, block: impl Into<BlockTag>) -> Self {
        Self {
            kind,
            object_id: object_id.into(),
            block: block.into(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn block(&self) -> BlockTag {
        self.block
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.object_id, self.block)
    }
}

impl FromStr for CacheKey {
    type Err = TypesError;

    /// Object ids may contain `:` (e.g. `eth:0xabc`), so the kind is taken
    /// from the first separator and the block from the last.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidCacheKey(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (object_id, block) = rest.rsplit_once(':').ok_or_else(invalid)?;
        Ok(Self {
            kind: kind.parse()?,
            object_id: object_id.to_string(),
            block: block.parse()?,
        })
    }
}

impl Serialize for CacheKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_kind_id_and_block() {
        let key = CacheKey::new(ItemKind::Space, "s:ens.eth", Some(42));
        assert_eq!(key.to_string(), "space:s:ens.eth:42");
        let key = CacheKey::new(ItemKind::Proposal, "0xabc", None);
        assert_eq!(key.to_string(), "proposal:0xabc:latest");
    }

    #[test]
    fn absent_block_equals_latest() {
        let a = CacheKey::new(ItemKind::Proposal, "0xabc", None);
        let b = CacheKey::new(ItemKind::Proposal, "0xabc", BlockTag::Latest);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn kind_separates_same_object() {
        let space = CacheKey::new(ItemKind::Space, "0xabc", Some(1));
        let proposal = CacheKey::new(ItemKind::Proposal, "0xabc", Some(1));
        assert_ne!(space, proposal);
        assert_ne!(space.to_string(), proposal.to_string());
    }

    #[test]
    fn parses_ids_containing_separator() {
        let key: CacheKey = "space:sn:0x1:latest".parse().unwrap();
        assert_eq!(key.kind(), ItemKind::Space);
        assert_eq!(key.object_id(), "sn:0x1");
        assert_eq!(key.block(), BlockTag::Latest);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("space".parse::<CacheKey>().is_err());
        assert!("space:0x1".parse::<CacheKey>().is_err());
        assert!(matches!(
            "vote:0x1:1".parse::<CacheKey>(),
            Err(TypesError::InvalidItemKind(_))
        ));
    }
}
