//! Block tag: a historical chain height or the current head.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Rendered name of the chain head in cache keys and on the wire.
pub const LATEST_BLOCK_NAME: &str = "latest";

/// The block at which voting power is evaluated.
///
/// An absent block and the literal `latest` are the same tag, so callers
/// holding an `Option<u64>` convert with `BlockTag::from` and never build
/// keys from the option directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockTag {
    #[default]
    Latest,
    Number(u64),
}

impl BlockTag {
    /// The block height, or `None` for the head.
    pub fn number(&self) -> Option<u64> {
        match self {
            Self::Latest => None,
            Self::Number(n) => Some(*n),
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl From<Option<u64>> for BlockTag {
    fn from(block: Option<u64>) -> Self {
        block.map_or(Self::Latest, Self::Number)
    }
}

impl From<u64> for BlockTag {
    fn from(block: u64) -> Self {
        Self::Number(block)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST_BLOCK_NAME),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LATEST_BLOCK_NAME {
            return Ok(Self::Latest);
        }
        s.parse::<u64>()
            .map(Self::Number)
            .map_err(|_| TypesError::InvalidBlockTag(s.to_string()))
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Latest => serializer.serialize_str(LATEST_BLOCK_NAME),
            Self::Number(n) => serializer.serialize_u64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
            Null(()),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::Number(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Null(()) => Ok(Self::Latest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_latest() {
        assert_eq!(BlockTag::from(None), BlockTag::Latest);
        assert_eq!(BlockTag::from(Some(7)), BlockTag::Number(7));
        assert_eq!(BlockTag::Latest.number(), None);
        assert_eq!(BlockTag::from(7u64).number(), Some(7));
        assert_eq!("latest".parse::<BlockTag>().unwrap(), BlockTag::Latest);
    }

    #[test]
    fn display_and_parse_agree() {
        for tag in [BlockTag::Latest, BlockTag::Number(0), BlockTag::Number(19_000_000)] {
            assert_eq!(tag.to_string().parse::<BlockTag>().unwrap(), tag);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "LATEST".parse::<BlockTag>(),
            Err(TypesError::InvalidBlockTag(_))
        ));
        assert!("-1".parse::<BlockTag>().is_err());
        assert!("".parse::<BlockTag>().is_err());
    }

    #[test]
    fn deserializes_number_string_and_null() {
        let n: BlockTag = serde_json::from_str("123").unwrap();
        assert_eq!(n, BlockTag::Number(123));
        let s: BlockTag = serde_json::from_str("\"456\"").unwrap();
        assert_eq!(s, BlockTag::Number(456));
        let l: BlockTag = serde_json::from_str("\"latest\"").unwrap();
        assert_eq!(l, BlockTag::Latest);
        let null: BlockTag = serde_json::from_str("null").unwrap();
        assert_eq!(null, BlockTag::Latest);
    }
}
