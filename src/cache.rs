//! Collection Fetcher/Cache
//!
//! Holds the last fetched snapshot per scope. Concurrent refreshes of one
//! scope share a single in-flight fetch, and every fetch carries a sequence
//! number so a slow, older response never replaces a newer snapshot.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::Scope;
use crate::domain::{ordering, SyncResult, Wish};
use crate::repository::WishRepository;

/// One resolved fetch, already split and sorted for display
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub seq: u64,
    pub active: Vec<Wish>,
    /// Soft-deleted rows the server chose to return
    pub deleted: Vec<Wish>,
    pub fetched_at: DateTime<Utc>,
}

type SharedFetch = Shared<BoxFuture<'static, SyncResult<Arc<Snapshot>>>>;

#[derive(Clone)]
struct InFlight {
    seq: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct ScopeEntry {
    next_seq: u64,
    /// Snapshots with `seq <= stale_through` must be refetched before use
    stale_through: u64,
    committed: Option<Arc<Snapshot>>,
    in_flight: Option<InFlight>,
}

impl ScopeEntry {
    fn fresh(&self) -> Option<Arc<Snapshot>> {
        self.committed
            .as_ref()
            .filter(|s| s.seq > self.stale_through)
            .cloned()
    }
}

struct CacheInner {
    repo: Arc<dyn WishRepository>,
    scopes: Mutex<HashMap<Scope, ScopeEntry>>,
}

/// Cheap to clone; clones share the same snapshots and in-flight fetches
#[derive(Clone)]
pub struct WishCache {
    inner: Arc<CacheInner>,
}

impl WishCache {
    pub fn new(repo: Arc<dyn WishRepository>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                repo,
                scopes: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Active wishes in display order, fetching only when nothing fresh is held
    pub async fn list(&self, scope: &Scope) -> SyncResult<Vec<Wish>> {
        Ok(self.snapshot(scope).await?.active.clone())
    }

    /// Soft-deleted wishes from the same snapshot as `list`
    pub async fn trash(&self, scope: &Scope) -> SyncResult<Vec<Wish>> {
        Ok(self.snapshot(scope).await?.deleted.clone())
    }

    pub async fn snapshot(&self, scope: &Scope) -> SyncResult<Arc<Snapshot>> {
        let in_flight = {
            let mut scopes = self.inner.scopes.lock().await;
            let entry = scopes.entry(scope.clone()).or_default();
            if let Some(snapshot) = entry.fresh() {
                return Ok(snapshot);
            }
            self.join_or_start(scope, entry)
        };
        self.settle(scope, in_flight).await
    }

    /// Last committed snapshot, stale or not. Never touches the network.
    pub async fn cached(&self, scope: &Scope) -> Option<Arc<Snapshot>> {
        let scopes = self.inner.scopes.lock().await;
        scopes.get(scope).and_then(|e| e.committed.clone())
    }

    /// Invalidate and refetch. Callers arriving while a fetch is in flight
    /// share it; its result is then treated as stale on arrival so the next
    /// read goes back to the server.
    pub async fn refresh(&self, scope: &Scope) -> SyncResult<Arc<Snapshot>> {
        let in_flight = {
            let mut scopes = self.inner.scopes.lock().await;
            let entry = scopes.entry(scope.clone()).or_default();
            let committed_seq = entry.committed.as_ref().map_or(0, |s| s.seq);
            entry.stale_through = entry.stale_through.max(committed_seq);
            match entry.in_flight.clone() {
                Some(in_flight) => {
                    debug!("Joining fetch #{} for {}", in_flight.seq, scope);
                    entry.stale_through = entry.stale_through.max(in_flight.seq);
                    in_flight
                }
                None => self.join_or_start(scope, entry),
            }
        };
        self.settle(scope, in_flight).await
    }

    /// Mark everything held for `scope` stale and detach any in-flight fetch.
    /// The detached fetch still resolves for its waiters but can only commit
    /// if nothing newer has.
    pub async fn invalidate(&self, scope: &Scope) {
        let mut scopes = self.inner.scopes.lock().await;
        if let Some(entry) = scopes.get_mut(scope) {
            entry.in_flight = None;
            entry.stale_through = entry.next_seq;
            debug!("Invalidated {} through fetch #{}", scope, entry.next_seq);
        }
    }

    fn join_or_start(&self, scope: &Scope, entry: &mut ScopeEntry) -> InFlight {
        if let Some(in_flight) = &entry.in_flight {
            return in_flight.clone();
        }

        entry.next_seq += 1;
        let seq = entry.next_seq;
        let repo = self.inner.repo.clone();
        let target = scope.clone();
        let fetch = async move {
            let wishes = repo.list(&target).await?;
            let (active, deleted) = ordering::partition_for_display(wishes);
            Ok(Arc::new(Snapshot {
                seq,
                active,
                deleted,
                fetched_at: Utc::now(),
            }))
        }
        .boxed()
        .shared();

        debug!("Starting fetch #{} for {}", seq, scope);
        let in_flight = InFlight { seq, fetch };
        entry.in_flight = Some(in_flight.clone());
        in_flight
    }

    async fn settle(&self, scope: &Scope, in_flight: InFlight) -> SyncResult<Arc<Snapshot>> {
        let result = in_flight.fetch.await;

        let mut scopes = self.inner.scopes.lock().await;
        let entry = scopes.entry(scope.clone()).or_default();
        if entry.in_flight.as_ref().is_some_and(|f| f.seq == in_flight.seq) {
            entry.in_flight = None;
        }

        let snapshot = result?;
        match &entry.committed {
            Some(current) if current.seq == snapshot.seq => Ok(current.clone()),
            Some(current) if current.seq > snapshot.seq => {
                warn!(
                    "Discarding fetch #{} for {}: #{} already committed",
                    snapshot.seq, scope, current.seq
                );
                Ok(current.clone())
            }
            _ => {
                info!(
                    "Committed fetch #{} for {} ({} active, {} deleted)",
                    snapshot.seq,
                    scope,
                    snapshot.active.len(),
                    snapshot.deleted.len()
                );
                entry.committed = Some(snapshot.clone());
                Ok(snapshot)
            }
        }
    }
}
