//! Cache-or-fetch orchestration for the crew roster.
//!
//! `CrewRepository` owns the decision between serving the durable cache
//! and going to the network, translates every lower-layer failure into
//! a typed `CrewError` before it leaves this boundary, and exposes a
//! busy flag observers can watch. All I/O runs on the background
//! context; results are delivered there and context switching is left
//! to the caller.
//!
//! Concurrent `get_crew` calls are independent invocations: there is no
//! in-flight request coalescing, and two overlapping refreshes race
//! last-writer-wins on the single cache key.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::CrewApi;
use crate::cache::{BlobStore, CacheEntry};
use crate::error::CrewError;
use crate::models::CrewMember;
use crate::sched::Scheduler;

/// Single cache key; the roster is a single-entry-per-key resource.
const CREW_CACHE_KEY: &str = "crew";

/// Cached roster lifetime in hours. The roster changes rarely; one day
/// keeps launches reasonably fresh without hammering the API.
const CACHE_TTL_HOURS: i64 = 24;

/// Outcome of a crew fetch: the full roster or a typed failure.
pub type FetchResult = Result<Vec<CrewMember>, CrewError>;

pub struct CrewRepository {
    sched: Scheduler,
    api: Arc<dyn CrewApi>,
    store: Arc<dyn BlobStore>,
    ttl: Duration,
    busy_tx: watch::Sender<bool>,
}

/// Raises the busy flag on creation and lowers it on drop, so every
/// exit path out of `get_crew` - success, failure, or unwind - clears
/// the flag.
struct BusyGuard<'a> {
    tx: &'a watch::Sender<bool>,
}

impl<'a> BusyGuard<'a> {
    fn raise(tx: &'a watch::Sender<bool>) -> Self {
        tx.send_replace(true);
        Self { tx }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.tx.send_replace(false);
    }
}

impl CrewRepository {
    /// Build a repository with the default one-day cache lifetime.
    pub fn new(sched: Scheduler, api: Arc<dyn CrewApi>, store: Arc<dyn BlobStore>) -> Self {
        Self::with_ttl(sched, api, store, Duration::hours(CACHE_TTL_HOURS))
    }

    pub fn with_ttl(
        sched: Scheduler,
        api: Arc<dyn CrewApi>,
        store: Arc<dyn BlobStore>,
        ttl: Duration,
    ) -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            sched,
            api,
            store,
            ttl,
            busy_tx,
        }
    }

    /// Current busy state.
    pub fn is_busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    /// Observable busy flag; receivers see the raise/lower transitions
    /// around each `get_crew` call.
    pub fn busy_changes(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Fetch the crew roster.
    ///
    /// With `force_refresh` the cache read is skipped and a successful
    /// network fetch is persisted before returning. Otherwise a valid
    /// cached entry is served without network access, and an absent or
    /// expired entry falls through to the same fetch-and-persist path.
    pub async fn get_crew(&self, force_refresh: bool) -> FetchResult {
        let _busy = BusyGuard::raise(&self.busy_tx);
        debug!(force_refresh, "Crew fetch starting");

        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let ttl = self.ttl;

        let handle = self.sched.spawn_background(async move {
            if force_refresh {
                Self::fetch_and_store(api.as_ref(), store.as_ref(), ttl).await
            } else {
                Self::cached_or_fetch(api.as_ref(), store.as_ref(), ttl).await
            }
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => Err(CrewError::Cache(format!("background fetch aborted: {e}"))),
        }
    }

    async fn cached_or_fetch(
        api: &dyn CrewApi,
        store: &dyn BlobStore,
        ttl: Duration,
    ) -> FetchResult {
        match store.get(CREW_CACHE_KEY).await {
            Ok(Some(entry)) if !entry.is_expired() => {
                debug!("Serving crew roster from cache");
                CrewMember::roster_from_json(&entry.payload)
            }
            Ok(Some(_)) => {
                debug!("Cache entry expired, fetching from network");
                Self::fetch_and_store(api, store, ttl).await
            }
            Ok(None) => {
                debug!("Cache miss, fetching from network");
                Self::fetch_and_store(api, store, ttl).await
            }
            // A store failure is not a miss; report it instead of
            // refetching forever.
            Err(e) => Err(CrewError::Cache(e.to_string())),
        }
    }

    /// Fetch, validate, persist, return - in that order. A payload that
    /// fails validation is never written to the store.
    async fn fetch_and_store(
        api: &dyn CrewApi,
        store: &dyn BlobStore,
        ttl: Duration,
    ) -> FetchResult {
        let payload = api
            .fetch_all()
            .await
            .map_err(|e| CrewError::Network(e.to_string()))?;

        let crew = CrewMember::roster_from_json(&payload)?;

        // Persist the validated records in canonical form, not the raw
        // network bytes.
        let entry = CacheEntry::new(CrewMember::roster_to_json(&crew)?, ttl);
        store
            .put(CREW_CACHE_KEY, entry)
            .await
            .map_err(|e| CrewError::Cache(e.to_string()))?;

        info!(count = crew.len(), "Crew roster fetched and cached");
        Ok(crew)
    }
}
