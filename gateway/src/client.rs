//! JSON-RPC client for a remote score service.
//!
//! Sends `POST {url}` with a `get_vp` call and parses one result per
//! strategy. An error object with [`VOTING_POWER_DETAILS_CODE`] or a
//! `data.details` field is an explainable failure and becomes
//! [`GatewayError::VotingPowerDetails`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use vp_types::{StrategyMetadata, VotingPowerResult};

use crate::error::VotingPowerDetailsError;
use crate::{GatewayError, NetworkGateway, VotingPowerQuery};

/// Default timeout for voting-power requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC error code the score service uses for explainable failures.
pub const VOTING_POWER_DETAILS_CODE: i64 = -32001;

const METHOD: &str = "get_vp";

/// Gateway backed by a score service reachable over HTTP.
pub struct HttpGateway {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: GetVpParams<'a>,
}

#[derive(Debug, Serialize)]
struct GetVpParams<'a> {
    space: &'a str,
    network: &'a str,
    strategies: &'a [String],
    strategies_params: &'a [String],
    strategies_metadata: &'a [StrategyMetadata],
    address: &'a str,
    /// Block number, or `"latest"`.
    snapshot: vp_types::BlockTag,
    chain_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<VotingPowerResult>>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl HttpGateway {
    /// Create a gateway for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_timeouts(url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured service URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request<'a>(&self, query: &VotingPowerQuery<'a>) -> RpcRequest<'a> {
        RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: METHOD,
            params: GetVpParams {
                space: query.object_id,
                network: query.network.as_str(),
                strategies: query.strategies.strategies,
                strategies_params: query.strategies.params,
                strategies_metadata: query.strategies.metadata,
                address: query.account.as_str(),
                snapshot: query.opts.at,
                chain_id: &query.opts.chain_id,
            },
        }
    }
}

#[async_trait]
impl NetworkGateway for HttpGateway {
    async fn get_voting_power(
        &self,
        query: VotingPowerQuery<'_>,
    ) -> Result<Vec<VotingPowerResult>, GatewayError> {
        let body = self.request(&query);
        tracing::debug!(url = %self.url, id = body.id, space = query.object_id, "get_vp");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    GatewayError::Unreachable(format!("connection failed: {e}"))
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let rpc: RpcResponse = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse(format!("failed to parse get_vp response: {e}"))
        })?;

        into_results(rpc, query.strategies.strategies.len())
    }
}

/// Turn a decoded response into results, checking one result per strategy.
fn into_results(rpc: RpcResponse, expected: usize) -> Result<Vec<VotingPowerResult>, GatewayError> {
    if let Some(error) = rpc.error {
        return Err(map_rpc_error(error));
    }
    let results = rpc
        .result
        .ok_or_else(|| GatewayError::InvalidResponse("response has neither result nor error".into()))?;
    if results.len() != expected {
        return Err(GatewayError::InvalidResponse(format!(
            "expected {expected} strategy results, got {}",
            results.len()
        )));
    }
    Ok(results)
}

fn map_rpc_error(error: RpcErrorBody) -> GatewayError {
    let details = error
        .data
        .as_ref()
        .and_then(|data| data.get("details"))
        .map(|d| d.as_str().map(str::to_string).unwrap_or_else(|| d.to_string()));

    if error.code == VOTING_POWER_DETAILS_CODE || details.is_some() {
        VotingPowerDetailsError::new(error.message, details).into()
    } else {
        GatewayError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}
