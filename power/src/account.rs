//! Account-change watcher.
//!
//! Every cache entry describes the connected account, so the cache is
//! dropped when the account changes or disconnects. The first connection
//! (empty to non-empty) keeps the cache, since nothing in it can belong to
//! another account.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use vp_types::Address;

use crate::FetchCoordinator;

/// Whether moving from `prev` to `next` invalidates the cache.
///
/// Addresses compare case-insensitively.
pub fn should_reset(prev: &Address, next: &Address) -> bool {
    next.is_empty() || (!prev.is_empty() && !prev.matches(next.as_str()))
}

/// Tracks the connected account and resets the coordinator on changes.
pub struct AccountWatcher {
    coordinator: Arc<FetchCoordinator>,
    current: Address,
}

impl AccountWatcher {
    pub fn new(coordinator: Arc<FetchCoordinator>, initial: Address) -> Self {
        Self {
            coordinator,
            current: initial,
        }
    }

    pub fn current(&self) -> &Address {
        &self.current
    }

    /// Record the next account value. Returns whether the cache was reset.
    pub fn observe(&mut self, next: Address) -> bool {
        let reset = should_reset(&self.current, &next);
        if reset {
            tracing::info!(from = %self.current, to = %next, "account changed");
            self.coordinator.reset();
        }
        self.current = next;
        reset
    }

    /// Observe every account value sent on `rx` until the sender is dropped.
    pub fn spawn(
        coordinator: Arc<FetchCoordinator>,
        initial: Address,
        mut rx: mpsc::Receiver<Address>,
    ) -> JoinHandle<()> {
        let mut watcher = Self::new(coordinator, initial);
        tokio::spawn(async move {
            while let Some(next) = rx.recv().await {
                watcher.observe(next);
            }
            tracing::debug!("account feed closed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn switching_accounts_resets() {
        assert!(should_reset(&addr("0xA"), &addr("0xB")));
    }

    #[test]
    fn first_connection_keeps_cache() {
        assert!(!should_reset(&addr(""), &addr("0xA")));
    }

    #[test]
    fn disconnect_resets() {
        assert!(should_reset(&addr("0xA"), &addr("")));
        assert!(should_reset(&addr(""), &addr("")));
    }

    #[test]
    fn same_account_keeps_cache() {
        assert!(!should_reset(&addr("0xA"), &addr("0xA")));
        assert!(!should_reset(&addr("0xabc"), &addr("0xABC")));
    }
}
