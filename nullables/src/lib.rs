//! Nullable infrastructure for deterministic testing.
//!
//! The only external dependency of the voting-power cache is the network
//! gateway. [`NullGateway`] stands in for it:
//! - returns scripted results or errors per strategy list
//! - records every call for assertions
//! - can hold calls open until released, to observe in-flight state
//!
//! Usage: register it in a `GatewayRegistry` in place of `HttpGateway`.

pub mod gateway;

pub use gateway::{NullGateway, NullResponse, RecordedCall};
