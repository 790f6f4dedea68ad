//! Error type for parsing and arithmetic on shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid block tag: {0}")]
    InvalidBlockTag(String),

    #[error("invalid cache key: {0}")]
    InvalidCacheKey(String),

    #[error("invalid item kind: {0}")]
    InvalidItemKind(String),

    #[error("invalid power amount: {0}")]
    InvalidPower(String),

    #[error("arithmetic overflow while normalizing {0}")]
    Overflow(&'static str),
}
