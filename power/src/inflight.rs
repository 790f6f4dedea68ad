//! Per-key single-flight bookkeeping.
//!
//! The first fetch for a key becomes the leader; fetches for the same key
//! arriving while it runs follow it and wait for its completion signal
//! instead of calling the gateway again. Flights belong to a cache
//! generation: after a reset, a new fetch for the key leads a fresh flight
//! even if the old one is still running.
//!
//! Bookkeeping is synchronous so a leader can end its flight from `Drop`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use vp_types::CacheKey;

struct Flight {
    id: u64,
    generation: u64,
    done: watch::Receiver<bool>,
}

/// Proof of leadership for one flight, handed back to
/// [`InFlight::finish`].
pub(crate) struct FlightHandle {
    key: CacheKey,
    id: u64,
    done: watch::Sender<bool>,
}

pub(crate) enum Begin {
    Leader(FlightHandle),
    Follower(watch::Receiver<bool>),
}

#[derive(Default)]
pub(crate) struct InFlight {
    flights: Mutex<HashMap<CacheKey, Flight>>,
    next_id: AtomicU64,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn flights(&self) -> MutexGuard<'_, HashMap<CacheKey, Flight>> {
        self.flights.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Join the running flight for `key` or start one.
    pub(crate) fn begin(&self, key: &CacheKey, generation: u64) -> Begin {
        let mut flights = self.flights();
        if let Some(flight) = flights.get(key) {
            // A dropped leader closes its channel; treat that flight as gone.
            let alive = flight.done.has_changed().is_ok();
            if alive && flight.generation == generation {
                return Begin::Follower(flight.done.clone());
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(false);
        flights.insert(
            key.clone(),
            Flight {
                id,
                generation,
                done: rx,
            },
        );
        Begin::Leader(FlightHandle {
            key: key.clone(),
            id,
            done: tx,
        })
    }

    /// End a flight and wake its followers.
    pub(crate) fn finish(&self, handle: FlightHandle) {
        {
            let mut flights = self.flights();
            if flights.get(&handle.key).is_some_and(|f| f.id == handle.id) {
                flights.remove(&handle.key);
            }
        }
        handle.done.send_replace(true);
    }

    /// Forget all flights. Running leaders still wake their own followers.
    pub(crate) fn clear(&self) {
        self.flights().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.flights().len()
    }
}

/// Wait until a followed flight has finished (or its leader was dropped).
pub(crate) async fn wait(mut done: watch::Receiver<bool>) {
    let _ = done.wait_for(|finished| *finished).await;
}
