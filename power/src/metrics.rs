//! Prometheus metrics for the voting-power cache.
//!
//! [`PowerMetrics`] owns a dedicated [`Registry`] that an embedding
//! application can encode into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

/// Cache and fetch activity counters.
pub struct PowerMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Fetches that called the gateway.
    pub fetches_started: IntCounter,
    /// Fetches answered from a `success` entry.
    pub cache_hits: IntCounter,
    /// Fetches that waited on another fetch for the same key.
    pub inflight_joins: IntCounter,
    pub fetch_successes: IntCounter,
    /// Failures with typed voting-power details.
    pub fetch_detail_errors: IntCounter,
    /// All other failures.
    pub fetch_unexpected_errors: IntCounter,
    /// Results dropped because the cache was reset mid-fetch.
    pub discarded_commits: IntCounter,
    pub resets: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Fetches currently waiting on the gateway.
    pub inflight: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent waiting on the gateway calls of one fetch, in milliseconds.
    pub gateway_latency_ms: Histogram,
}

impl PowerMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| {
            register_int_counter_with_registry!(Opts::new(name, help), registry)
                .unwrap_or_else(|e| panic!("failed to register {name} counter: {e}"))
        };

        let fetches_started = counter("vp_fetches_started_total", "Fetches that called the gateway");
        let cache_hits = counter("vp_cache_hits_total", "Fetches answered from the cache");
        let inflight_joins = counter(
            "vp_inflight_joins_total",
            "Fetches that joined a running fetch for the same key",
        );
        let fetch_successes = counter("vp_fetch_successes_total", "Fetches committed as success");
        let fetch_detail_errors = counter(
            "vp_fetch_detail_errors_total",
            "Fetches failed with voting power details",
        );
        let fetch_unexpected_errors = counter(
            "vp_fetch_unexpected_errors_total",
            "Fetches failed for any other reason",
        );
        let discarded_commits = counter(
            "vp_discarded_commits_total",
            "Fetch results dropped after a cache reset",
        );
        let resets = counter("vp_resets_total", "Full cache resets");

        let inflight = register_int_gauge_with_registry!(
            Opts::new("vp_inflight_fetches", "Fetches currently waiting on the gateway"),
            registry
        )
        .expect("failed to register inflight gauge");

        // Exponential buckets covering 1 ms → ~16 s.
        let gateway_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "vp_gateway_latency_ms",
                "Gateway latency per fetch in milliseconds"
            )
            .buckets(
                prometheus::exponential_buckets(1.0, 2.0, 15)
                    .expect("static bucket layout is valid")
            ),
            registry
        )
        .expect("failed to register gateway_latency_ms histogram");

        Self {
            registry,
            fetches_started,
            cache_hits,
            inflight_joins,
            fetch_successes,
            fetch_detail_errors,
            fetch_unexpected_errors,
            discarded_commits,
            resets,
            inflight,
            gateway_latency_ms,
        }
    }
}

impl Default for PowerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_are_registered() {
        let metrics = PowerMetrics::new();
        metrics.cache_hits.inc();
        metrics.gateway_latency_ms.observe(3.0);
        let names: Vec<String> = metrics
            .registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"vp_cache_hits_total".to_string()));
        assert!(names.contains(&"vp_gateway_latency_ms".to_string()));
    }

    #[test]
    fn separate_instances_do_not_collide() {
        let a = PowerMetrics::new();
        let b = PowerMetrics::new();
        a.resets.inc();
        assert_eq!(a.resets.get(), 1);
        assert_eq!(b.resets.get(), 0);
    }
}
