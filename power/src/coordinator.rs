//! The fetch coordinator: single owner and only writer of the cache.

use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use vp_gateway::{FetchOptions, GatewayError, GatewayRegistry, VotingPowerQuery};
use vp_types::{Address, BlockTag, CacheKey, GovernanceItem, VotingPowerResult};

use crate::inflight::{self, Begin, FlightHandle, InFlight};
use crate::tracing_spans::{fetch_span, gateway_span, reset_span};
use crate::{
    Eligibility, EligibilitySource, PowerError, PowerMetrics, VotingPowerCache, VotingPowerEntry,
    VotingPowerStatus,
};

/// How a [`FetchCoordinator::fetch`] call settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The key was already `success`; nothing was fetched.
    CacheHit,
    /// Another fetch for the key was running; this call waited for it.
    Joined,
    /// This call fetched and committed an entry with the given status.
    Committed(VotingPowerStatus),
    /// The cache was reset while fetching; the result was dropped.
    Discarded,
}

/// Fetches voting power on demand and caches it per key.
///
/// Shared as `Arc<FetchCoordinator>` between the UI layer, which calls
/// [`fetch`](Self::fetch) and reads entries, and the account watcher, which
/// calls [`reset`](Self::reset).
pub struct FetchCoordinator {
    gateways: GatewayRegistry,
    cache: VotingPowerCache,
    inflight: InFlight,
    metrics: Arc<PowerMetrics>,
}

impl FetchCoordinator {
    pub fn new(gateways: GatewayRegistry) -> Self {
        Self::with_metrics(gateways, Arc::new(PowerMetrics::new()))
    }

    pub fn with_metrics(gateways: GatewayRegistry, metrics: Arc<PowerMetrics>) -> Self {
        Self {
            gateways,
            cache: VotingPowerCache::new(),
            inflight: InFlight::new(),
            metrics,
        }
    }

    /// Read-only view of the cache.
    pub fn cache(&self) -> &VotingPowerCache {
        &self.cache
    }

    pub fn metrics(&self) -> &Arc<PowerMetrics> {
        &self.metrics
    }

    pub fn get(&self, key: &CacheKey) -> Option<VotingPowerEntry> {
        self.cache.get(key)
    }

    /// The entry answering `item`'s eligibility question at `block`.
    pub fn entry(
        &self,
        item: &GovernanceItem,
        block: impl Into<BlockTag>,
    ) -> Option<VotingPowerEntry> {
        self.cache.get(&item.cache_key(block))
    }

    /// Status of `item`'s entry at `block`; `Idle` when never fetched.
    pub fn status(&self, item: &GovernanceItem, block: impl Into<BlockTag>) -> VotingPowerStatus {
        self.cache.status(&item.cache_key(block))
    }

    /// Number of fetches currently leading a flight.
    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// Fetch voting power of `account` for `item` at `block` and commit it.
    ///
    /// Returns immediately for keys already in `success`. Never fails:
    /// every gateway or aggregation failure ends in an `error` entry, and
    /// so does a fetch whose future is dropped before it completes.
    pub async fn fetch(
        &self,
        item: &GovernanceItem,
        account: &Address,
        block: impl Into<BlockTag>,
    ) -> FetchOutcome {
        let block = block.into();
        let key = item.cache_key(block);
        let span = fetch_span(&key, account.as_str());
        self.fetch_key(item, account, block, key)
            .instrument(span)
            .await
    }

    async fn fetch_key(
        &self,
        item: &GovernanceItem,
        account: &Address,
        block: BlockTag,
        key: CacheKey,
    ) -> FetchOutcome {
        if self.cache.status(&key) == VotingPowerStatus::Success {
            tracing::debug!("cache hit");
            self.metrics.cache_hits.inc();
            return FetchOutcome::CacheHit;
        }

        let generation = self.cache.generation();
        let flight = match self.inflight.begin(&key, generation) {
            Begin::Leader(flight) => flight,
            Begin::Follower(done) => {
                tracing::debug!("joining running fetch");
                self.metrics.inflight_joins.inc();
                inflight::wait(done).await;
                return FetchOutcome::Joined;
            }
        };
        let mut lead = Lead::new(self, key, generation, flight);

        // A flight for this key may have committed between the cache check
        // and taking the lead.
        if self.cache.status(&lead.key) == VotingPowerStatus::Success {
            return FetchOutcome::CacheHit;
        }

        self.run(&mut lead, item, account, block).await
    }

    async fn run(
        &self,
        lead: &mut Lead<'_>,
        item: &GovernanceItem,
        account: &Address,
        block: BlockTag,
    ) -> FetchOutcome {
        let source = EligibilitySource::new(item, account);
        let initial = source.initial();
        let symbol = item.symbol();

        if !self.cache.mark_loading(&lead.key, lead.generation, || {
            VotingPowerEntry::loading(symbol, initial)
        }) {
            self.metrics.discarded_commits.inc();
            return FetchOutcome::Discarded;
        }
        lead.abandoned = Some(VotingPowerEntry::failed(symbol, initial, None));

        self.metrics.fetches_started.inc();
        lead.track_inflight();
        let result = self.evaluate(&source, account, block).await;

        let entry = match result {
            Ok((results, eligibility)) => {
                self.metrics.fetch_successes.inc();
                VotingPowerEntry::succeeded(symbol, results, eligibility)
            }
            Err(PowerError::Gateway(GatewayError::VotingPowerDetails(details))) => {
                tracing::debug!(error = %details, "voting power details error");
                self.metrics.fetch_detail_errors.inc();
                VotingPowerEntry::failed(symbol, initial, Some(details))
            }
            Err(e) => {
                tracing::warn!("failed to load voting power: {e}");
                self.metrics.fetch_unexpected_errors.inc();
                VotingPowerEntry::failed(symbol, initial, None)
            }
        };

        lead.abandoned = None;
        let status = entry.status();
        if self.cache.commit(lead.key.clone(), lead.generation, entry) {
            FetchOutcome::Committed(status)
        } else {
            tracing::debug!("cache was reset during fetch, dropping result");
            self.metrics.discarded_commits.inc();
            FetchOutcome::Discarded
        }
    }

    /// Run the gateway calls and derive eligibility.
    async fn evaluate(
        &self,
        source: &EligibilitySource<'_>,
        account: &Address,
        block: BlockTag,
    ) -> Result<(Vec<VotingPowerResult>, Eligibility), PowerError> {
        let item = source.item();
        let gateway = self.gateways.resolve(item.network())?;
        let opts = FetchOptions {
            at: block,
            chain_id: item.chain_id().to_string(),
        };

        let voting_query = VotingPowerQuery {
            object_id: item.space_id(),
            network: item.network(),
            strategies: item.voting_strategies(),
            account,
            opts: &opts,
        };
        let propose_query = source
            .space()
            .filter(|_| source.needs_propose_call())
            .map(|space| VotingPowerQuery {
                object_id: &space.id,
                network: &space.network,
                strategies: space.proposal_validation.view(),
                account,
                opts: &opts,
            });

        let span = gateway_span(item.network().as_str(), propose_query.is_some());
        let started = Instant::now();
        let (voting, propose) = async {
            tokio::try_join!(gateway.get_voting_power(voting_query), async {
                match propose_query {
                    Some(query) => gateway.get_voting_power(query).await.map(Some),
                    None => Ok(None),
                }
            })
        }
        .instrument(span)
        .await?;
        self.metrics
            .gateway_latency_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        let eligibility = source.derive(&voting, propose.as_deref())?;
        Ok((voting, eligibility))
    }

    /// Drop every entry. Fetches still running will not commit.
    pub fn reset(&self) {
        let _span = reset_span("account changed").entered();
        let dropped = self.cache.clear();
        self.inflight.clear();
        self.metrics.resets.inc();
        tracing::info!(dropped, generation = self.cache.generation(), "voting power cache reset");
    }
}

/// A leading fetch. Dropping it ends the flight and, if the fetch was
/// abandoned after marking its key as loading, settles the key as `error`.
struct Lead<'a> {
    coordinator: &'a FetchCoordinator,
    key: CacheKey,
    generation: u64,
    flight: Option<FlightHandle>,
    /// Entry to commit if the fetch never reaches its own commit.
    abandoned: Option<VotingPowerEntry>,
    counted: bool,
}

impl<'a> Lead<'a> {
    fn new(
        coordinator: &'a FetchCoordinator,
        key: CacheKey,
        generation: u64,
        flight: FlightHandle,
    ) -> Self {
        Self {
            coordinator,
            key,
            generation,
            flight: Some(flight),
            abandoned: None,
            counted: false,
        }
    }

    fn track_inflight(&mut self) {
        self.coordinator.metrics.inflight.inc();
        self.counted = true;
    }
}

impl Drop for Lead<'_> {
    fn drop(&mut self) {
        let coordinator = self.coordinator;
        if self.counted {
            coordinator.metrics.inflight.dec();
        }
        if let Some(entry) = self.abandoned.take() {
            tracing::debug!(key = %self.key, "fetch dropped before completion");
            coordinator.metrics.fetch_unexpected_errors.inc();
            coordinator
                .cache
                .commit(self.key.clone(), self.generation, entry);
        }
        if let Some(flight) = self.flight.take() {
            coordinator.inflight.finish(flight);
        }
    }
}
