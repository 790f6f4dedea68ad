//! Coordinator configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use vp_gateway::{GatewayRegistry, HttpGateway};
use vp_types::NetworkId;

use crate::{LogFormat, PowerError};

/// One network and the score service answering for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub network: NetworkId,
    pub url: String,
}

/// Configuration for a voting-power coordinator.
///
/// Can be loaded from a TOML file via [`PowerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whole-request timeout for gateway calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Score services, one per network.
    #[serde(default)]
    pub gateways: Vec<GatewayConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PowerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PowerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PowerError> {
        let config: Self = toml::from_str(s).map_err(|e| PowerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, PowerError> {
        toml::to_string_pretty(self).map_err(|e| PowerError::Config(e.to_string()))
    }

    /// Reject empty URLs and networks configured twice.
    pub fn validate(&self) -> Result<(), PowerError> {
        let mut seen = HashSet::new();
        for gateway in &self.gateways {
            if gateway.url.trim().is_empty() {
                return Err(PowerError::Config(format!(
                    "gateway for network {} has an empty url",
                    gateway.network
                )));
            }
            if !seen.insert(&gateway.network) {
                return Err(PowerError::Config(format!(
                    "network {} configured more than once",
                    gateway.network
                )));
            }
        }
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, PowerError> {
        self.log_format.parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Build an HTTP gateway per configured network.
    pub fn build_registry(&self) -> Result<GatewayRegistry, PowerError> {
        self.validate()?;
        let mut registry = GatewayRegistry::new();
        for gateway in &self.gateways {
            let client = HttpGateway::with_timeouts(
                gateway.url.clone(),
                self.request_timeout(),
                self.connect_timeout(),
            )?;
            registry.register(gateway.network.clone(), Arc::new(client));
        }
        Ok(registry)
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            gateways: Vec::new(),
        }
    }
}
