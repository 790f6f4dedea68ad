//! Gateway registry: one gateway per network.

use std::collections::HashMap;
use std::sync::Arc;

use vp_types::NetworkId;

use crate::{GatewayError, NetworkGateway};

/// Known gateways keyed by the network they evaluate strategies on.
#[derive(Clone, Default)]
pub struct GatewayRegistry {
    gateways: HashMap<NetworkId, Arc<dyn NetworkGateway>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the gateway for a network.
    pub fn register(&mut self, network: NetworkId, gateway: Arc<dyn NetworkGateway>) {
        self.gateways.insert(network, gateway);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, network: impl Into<NetworkId>, gateway: Arc<dyn NetworkGateway>) -> Self {
        self.register(network.into(), gateway);
        self
    }

    pub fn get(&self, network: &NetworkId) -> Option<Arc<dyn NetworkGateway>> {
        self.gateways.get(network).cloned()
    }

    /// Look up a gateway, failing for networks nobody registered.
    pub fn resolve(&self, network: &NetworkId) -> Result<Arc<dyn NetworkGateway>, GatewayError> {
        self.get(network)
            .ok_or_else(|| GatewayError::UnsupportedNetwork(network.to_string()))
    }

    /// Registered networks, sorted.
    pub fn networks(&self) -> Vec<&NetworkId> {
        let mut networks: Vec<_> = self.gateways.keys().collect();
        networks.sort();
        networks
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}
