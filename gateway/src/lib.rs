//! Network gateways: the seam between the voting-power cache and the
//! per-network strategy evaluators.
//!
//! - [`NetworkGateway`] evaluates a list of strategies for one account at one
//!   block and returns one result per strategy.
//! - [`GatewayRegistry`] picks the gateway for an item's network.
//! - [`HttpGateway`] talks JSON-RPC to a remote score service.
//!
//! How a strategy arrives at a balance is entirely the gateway's business.

pub mod client;
pub mod error;
pub mod gateway;
pub mod registry;

pub use client::HttpGateway;
pub use error::{GatewayError, VotingPowerDetailsError};
pub use gateway::{FetchOptions, NetworkGateway, VotingPowerQuery};
pub use registry::GatewayRegistry;
