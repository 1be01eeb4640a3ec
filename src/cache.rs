//! Snapshot cache with single-flight refresh
//!
//! One `RefreshCache` is built at startup and shared by every request
//! handler. The lock is held across the whole check-and-refresh sequence, so
//! at most one upstream refresh is in flight per process. Callers that queue
//! up behind a refresh receive that refresh's outcome instead of starting
//! their own.

use crate::upstream::Upstream;
use crate::upstream::models::{Launch, Rocket, Site};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(3600);

/// The three collections fetched together in one refresh cycle.
///
/// Published snapshots are never mutated; a refresh replaces the whole
/// `Arc<Snapshot>`, so readers never see old launches next to new reference
/// data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub launches: Vec<Launch>,
    pub rockets: Vec<Rocket>,
    pub sites: Vec<Site>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.launches.is_empty() && self.rockets.is_empty() && self.sites.is_empty()
    }

    /// Whether a freshly fetched snapshot may replace `current`.
    ///
    /// Rejects an all-empty fetch and any fetch where a collection that
    /// `current` holds came back empty (a failed fetch is indistinguishable
    /// from an empty one).
    fn can_replace(&self, current: &Snapshot) -> bool {
        if self.is_empty() {
            return false;
        }
        let lost_launches = !current.launches.is_empty() && self.launches.is_empty();
        let lost_rockets = !current.rockets.is_empty() && self.rockets.is_empty();
        let lost_sites = !current.sites.is_empty() && self.sites.is_empty();
        !(lost_launches || lost_rockets || lost_sites)
    }
}

/// Result of `RefreshCache::get_snapshot`
#[derive(Debug, Clone)]
pub struct Refresh {
    pub snapshot: Arc<Snapshot>,
    /// True only when this call's refresh was published and the number of
    /// launches differs from the previous snapshot.
    pub changed: bool,
    /// Refresh cycle this outcome belongs to; callers that shared one
    /// cycle see the same value.
    pub generation: u64,
}

struct CacheState {
    snapshot: Arc<Snapshot>,
    /// `None` until the first successful refresh, which forces the first call to fetch
    refreshed_at: Option<Instant>,
    last_refresh: Option<Refresh>,
}

pub struct RefreshCache {
    upstream: Arc<dyn Upstream>,
    expiry: Duration,
    state: Mutex<CacheState>,
    /// Number of completed refresh cycles; only written while `state` is locked
    generation: AtomicU64,
}

impl RefreshCache {
    pub fn new(upstream: Arc<dyn Upstream>, expiry: Duration) -> Self {
        Self {
            upstream,
            expiry,
            state: Mutex::new(CacheState {
                snapshot: Arc::new(Snapshot::default()),
                refreshed_at: None,
                last_refresh: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Return the current snapshot, refreshing it first if it has expired.
    ///
    /// Never fails: a broken upstream leaves the last good snapshot in place
    /// (or the empty snapshot if nothing was ever fetched).
    pub async fn get_snapshot(&self) -> Refresh {
        let arrived_at = self.generation.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        // a refresh cycle finished while we were queued on the lock
        if self.generation.load(Ordering::Acquire) != arrived_at {
            if let Some(refresh) = &state.last_refresh {
                return refresh.clone();
            }
        }

        if let Some(refreshed_at) = state.refreshed_at {
            if refreshed_at.elapsed() < self.expiry && !state.snapshot.is_empty() {
                return Refresh {
                    snapshot: state.snapshot.clone(),
                    changed: false,
                    generation: self.generation.load(Ordering::Acquire),
                };
            }
        }

        tracing::info!("Snapshot expired or missing, refreshing from upstream");
        let fetched = self.upstream.fetch_snapshot().await;
        let generation = self.generation.load(Ordering::Acquire) + 1;

        let refresh = if fetched.can_replace(&state.snapshot) {
            let changed = state.snapshot.launches.len() != fetched.launches.len();
            tracing::info!(
                "Published snapshot: {} launches, {} rockets, {} sites (changed: {})",
                fetched.launches.len(),
                fetched.rockets.len(),
                fetched.sites.len(),
                changed
            );
            state.snapshot = Arc::new(fetched);
            state.refreshed_at = Some(Instant::now());
            Refresh {
                snapshot: state.snapshot.clone(),
                changed,
                generation,
            }
        } else {
            tracing::warn!(
                "Upstream refresh returned incomplete data, keeping previous snapshot ({} launches)",
                state.snapshot.launches.len()
            );
            Refresh {
                snapshot: state.snapshot.clone(),
                changed: false,
                generation,
            }
        };

        state.last_refresh = Some(refresh.clone());
        self.generation.store(generation, Ordering::Release);
        refresh
    }

    /// Current snapshot without triggering a refresh
    pub async fn current(&self) -> Arc<Snapshot> {
        self.state.lock().await.snapshot.clone()
    }

    /// When the current snapshot was published, `None` if never
    pub async fn refreshed_at(&self) -> Option<Instant> {
        self.state.lock().await.refreshed_at
    }
}
