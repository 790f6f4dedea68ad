//! In-memory store of voting-power entries.
//!
//! Readers take cloned snapshots; only the coordinator writes. Every
//! [`clear`](VotingPowerCache::clear) advances the generation, and writes
//! tagged with an older generation are refused, so a fetch that started
//! before a reset cannot refill the cache with the previous account's data.
//!
//! No lock is held across an await, so the map sits behind a std `RwLock`
//! and can be written from `Drop` when a fetch is abandoned.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use vp_types::CacheKey;

use crate::{VotingPowerEntry, VotingPowerStatus};

/// Entries keyed by [`CacheKey`], plus the reset generation.
#[derive(Default)]
pub struct VotingPowerCache {
    entries: RwLock<HashMap<CacheKey, VotingPowerEntry>>,
    generation: AtomicU64,
}

impl VotingPowerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, VotingPowerEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, VotingPowerEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current generation. Starts at 0, advanced by every clear.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn get(&self, key: &CacheKey) -> Option<VotingPowerEntry> {
        self.read().get(key).cloned()
    }

    /// Status of a key; `Idle` when nothing was fetched for it.
    pub fn status(&self, key: &CacheKey) -> VotingPowerStatus {
        self.read()
            .get(key)
            .map_or(VotingPowerStatus::Idle, VotingPowerEntry::status)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All entries, ordered by key.
    pub fn snapshot(&self) -> Vec<(CacheKey, VotingPowerEntry)> {
        let mut all: Vec<_> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Flag `key` as loading, keeping its previous values, or insert `fresh`
    /// if the key has no entry. Refused if `generation` is stale.
    pub(crate) fn mark_loading(
        &self,
        key: &CacheKey,
        generation: u64,
        fresh: impl FnOnce() -> VotingPowerEntry,
    ) -> bool {
        let mut entries = self.write();
        if self.generation() != generation {
            return false;
        }
        entries
            .entry(key.clone())
            .and_modify(VotingPowerEntry::mark_loading)
            .or_insert_with(fresh);
        true
    }

    /// Replace the entry for `key` in one write. Refused if `generation` is
    /// stale.
    pub(crate) fn commit(&self, key: CacheKey, generation: u64, entry: VotingPowerEntry) -> bool {
        let mut entries = self.write();
        if self.generation() != generation {
            return false;
        }
        entries.insert(key, entry);
        true
    }

    /// Drop every entry and start a new generation. Returns the number of
    /// entries dropped.
    pub(crate) fn clear(&self) -> usize {
        let mut entries = self.write();
        let dropped = entries.len();
        entries.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Eligibility;
    use vp_types::ItemKind;

    fn key(id: &str) -> CacheKey {
        CacheKey::new(ItemKind::Space, id, None)
    }

    fn loading() -> VotingPowerEntry {
        VotingPowerEntry::loading("VP", Eligibility::default())
    }

    #[test]
    fn absent_key_is_idle() {
        let cache = VotingPowerCache::new();
        assert_eq!(cache.status(&key("a")), VotingPowerStatus::Idle);
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn mark_loading_inserts_then_flags() {
        let cache = VotingPowerCache::new();
        assert!(cache.mark_loading(&key("a"), 0, loading));
        assert_eq!(cache.status(&key("a")), VotingPowerStatus::Loading);

        let done = VotingPowerEntry::succeeded(
            "VP",
            vec![],
            Eligibility {
                can_propose: true,
                can_vote: false,
            },
        );
        assert!(cache.commit(key("a"), 0, done));
        assert!(cache.mark_loading(&key("a"), 0, loading));

        let entry = cache.get(&key("a")).unwrap();
        assert_eq!(entry.status(), VotingPowerStatus::Loading);
        assert!(entry.can_propose());
    }

    #[test]
    fn clear_drops_everything_and_advances_generation() {
        let cache = VotingPowerCache::new();
        cache.commit(key("a"), 0, loading());
        cache.commit(key("b"), 0, loading());
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn stale_generation_writes_are_refused() {
        let cache = VotingPowerCache::new();
        cache.clear();
        assert!(!cache.commit(key("a"), 0, loading()));
        assert!(!cache.mark_loading(&key("a"), 0, loading));
        assert!(cache.is_empty());
        assert!(cache.commit(key("a"), 1, loading()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn snapshot_is_sorted() {
        let cache = VotingPowerCache::new();
        cache.commit(key("b"), 0, loading());
        cache.commit(key("a"), 0, loading());
        let keys: Vec<String> = cache
            .snapshot()
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["space:a:latest", "space:b:latest"]);
    }
}
