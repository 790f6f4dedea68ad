//! Nullable gateway: scripted voting-power responses.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

use vp_gateway::{GatewayError, NetworkGateway, VotingPowerDetailsError, VotingPowerQuery};
use vp_types::{BlockTag, VotingPowerResult};

/// What the gateway answers for a given strategy list.
#[derive(Clone, Debug)]
pub enum NullResponse {
    Results(Vec<VotingPowerResult>),
    Details(VotingPowerDetailsError),
    Failure(String),
}

/// One call as seen by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub object_id: String,
    pub network: String,
    pub strategies: Vec<String>,
    pub account: String,
    pub at: BlockTag,
    pub chain_id: String,
}

/// A gateway that answers from a script instead of the network.
///
/// Strategy lists without a scripted response get one zero-value result per
/// strategy.
pub struct NullGateway {
    responses: Mutex<HashMap<Vec<String>, NullResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Mutex<Option<Duration>>,
    held: watch::Sender<bool>,
}

impl NullGateway {
    pub fn new() -> Self {
        let (held, _) = watch::channel(false);
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            held,
        }
    }

    /// Script the answer for calls with exactly these strategies.
    pub fn respond(&self, strategies: &[&str], response: NullResponse) {
        let key = strategies.iter().map(|s| s.to_string()).collect();
        self.responses.lock().unwrap().insert(key, response);
    }

    /// Script successful results for these strategies.
    pub fn respond_ok(&self, strategies: &[&str], results: Vec<VotingPowerResult>) {
        self.respond(strategies, NullResponse::Results(results));
    }

    /// Delay every answer by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Park every call until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Let parked and future calls complete.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// All calls received so far (for assertions).
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls made with exactly these strategies.
    pub fn calls_for(&self, strategies: &[&str]) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.strategies.iter().map(String::as_str).eq(strategies.iter().copied()))
            .count()
    }

    /// Clear recorded calls and scripted responses.
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
        self.responses.lock().unwrap().clear();
    }
}

impl Default for NullGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkGateway for NullGateway {
    async fn get_voting_power(
        &self,
        query: VotingPowerQuery<'_>,
    ) -> Result<Vec<VotingPowerResult>, GatewayError> {
        let strategies = query.strategies.strategies.to_vec();
        self.calls.lock().unwrap().push(RecordedCall {
            object_id: query.object_id.to_string(),
            network: query.network.to_string(),
            strategies: strategies.clone(),
            account: query.account.to_string(),
            at: query.opts.at,
            chain_id: query.opts.chain_id.clone(),
        });

        let mut held = self.held.subscribe();
        // The sender lives in `self`, so this only errors if the gateway is gone.
        let _ = held.wait_for(|held| !*held).await;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().unwrap().get(&strategies).cloned();
        match response {
            Some(NullResponse::Results(results)) => Ok(results),
            Some(NullResponse::Details(details)) => Err(details.into()),
            Some(NullResponse::Failure(message)) => Err(GatewayError::Other(message)),
            None => Ok(strategies
                .iter()
                .map(|s| VotingPowerResult::new(s.clone(), 0u64, 0))
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vp_gateway::FetchOptions;
    use vp_types::strategy::StrategyView;
    use vp_types::{Address, NetworkId};

    async fn call(gateway: &NullGateway, strategies: &[String]) -> Result<Vec<VotingPowerResult>, GatewayError> {
        let account = Address::new("0xa");
        let network = NetworkId::from("eth");
        let opts = FetchOptions {
            at: BlockTag::Number(5),
            chain_id: "1".into(),
        };
        gateway
            .get_voting_power(VotingPowerQuery {
                object_id: "0xspace",
                network: &network,
                strategies: StrategyView {
                    strategies,
                    params: &[],
                    metadata: &[],
                },
                account: &account,
                opts: &opts,
            })
            .await
    }

    #[tokio::test]
    async fn unscripted_strategies_get_zero_results() {
        let gateway = NullGateway::new();
        let results = call(&gateway, &["a".into(), "b".into()]).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.is_positive()));
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.calls()[0].at, BlockTag::Number(5));
    }

    #[tokio::test]
    async fn scripted_responses_are_returned() {
        let gateway = NullGateway::new();
        gateway.respond_ok(&["a"], vec![VotingPowerResult::new("a", 7u64, 0)]);
        gateway.respond(&["b"], NullResponse::Details(VotingPowerDetailsError::new("nope", None)));
        gateway.respond(&["c"], NullResponse::Failure("boom".into()));

        assert!(call(&gateway, &["a".into()]).await.unwrap()[0].is_positive());
        assert!(call(&gateway, &["b".into()]).await.unwrap_err().details().is_some());
        assert!(matches!(
            call(&gateway, &["c".into()]).await,
            Err(GatewayError::Other(_))
        ));
        assert_eq!(gateway.calls_for(&["b"]), 1);
    }

    #[tokio::test]
    async fn held_calls_wait_for_release() {
        let gateway = Arc::new(NullGateway::new());
        gateway.hold();

        let task = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { call(&gateway, &["a".into()]).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());
        assert_eq!(gateway.call_count(), 1);

        gateway.release();
        assert!(task.await.unwrap().is_ok());
    }
}
