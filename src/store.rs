//! The transaction sync store.
//!
//! The store owns the authoritative in-process view of the ledger. Reads are
//! served stale-while-revalidate: the durable cache answers immediately while
//! a background fetch reconciles it against the remote source, and registered
//! observers hear about any change the reconciliation finds. Mutations go to
//! the remote first; the cache only ever records what the remote confirmed.

use crate::api::Remote;
use crate::cache::Cache;
use crate::model::{NewTransaction, Transaction};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A callback invoked with the full current collection whenever background
/// reconciliation changes the visible data set.
pub type Observer = Box<dyn Fn(&[Transaction]) + Send + Sync>;

/// Identifies a registered observer so it can be unsubscribed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(u64);

/// A client-resident, eventually-consistent mirror of the remote transaction
/// collection.
///
/// Construct one per application, hold it in an [`Arc`], and inject it into
/// whatever needs ledger access. The store is the only writer of its cache.
pub struct SyncStore {
    cache: Cache,
    remote: Box<dyn Remote>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
}

impl SyncStore {
    pub fn new(cache: Cache, remote: Box<dyn Remote>) -> Self {
        Self {
            cache,
            remote,
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Returns the transaction collection, preferring the cache for latency.
    ///
    /// A background [`revalidate`](Self::revalidate) task is scheduled on
    /// every call. With a warm cache the cached collection is returned
    /// immediately and the task runs to completion on its own; observers hear
    /// about whatever it finds. On a cold start (empty cache) there is nothing
    /// worth returning, so the call waits for the task instead.
    ///
    /// The returned collection is always wholesale: the last known-good cached
    /// state or the freshly fetched state, never a merge of the two.
    pub async fn list(self: &Arc<Self>) -> Vec<Transaction> {
        let cached = self.cache.load().await;

        let store = Arc::clone(self);
        let revalidation = tokio::spawn(async move { store.revalidate().await });

        if !cached.is_empty() {
            return cached;
        }
        match revalidation.await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("revalidation task did not complete: {e}");
                Vec::new()
            }
        }
    }

    /// Fetches from the remote source and reconciles the cache against it.
    ///
    /// A fetch failure resolves to an empty collection rather than an error;
    /// revalidation is silent and lossy by design. Equality is a structural
    /// comparison of the serialized collections, so a remote-side reordering
    /// counts as a change (observers tolerate redundant notifications).
    ///
    /// When the fetched collection differs from the cache, the cache is
    /// overwritten and persisted first, and only then is every registered
    /// observer invoked with the new collection.
    pub async fn revalidate(&self) -> Vec<Transaction> {
        let fetched = match self.remote.fetch().await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!("background fetch failed: {e}");
                Vec::new()
            }
        };

        let cached = self.cache.load().await;
        if !same_collection(&fetched, &cached) {
            debug!(
                "reconciliation found a change: {} cached, {} fetched",
                cached.len(),
                fetched.len()
            );
            self.commit(&fetched).await;
        }
        fetched
    }

    /// Sends a new transaction to the remote source and, once the remote has
    /// assigned it an id, appends the authoritative record to the cache.
    ///
    /// Returns `None` when the remote call fails; the cache is left untouched
    /// and no observer is notified, so a failed add is simply invisible.
    pub async fn add(&self, new: NewTransaction) -> Option<Transaction> {
        let draft = new.normalize();
        let created = match self.remote.create(&draft).await {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!("add was not applied: {e}");
                return None;
            }
        };

        let mut transactions = self.cache.load().await;
        transactions.push(created.clone());
        self.commit(&transactions).await;
        Some(created)
    }

    /// Sends a full updated record to the remote source and replaces the
    /// matching cache entry with the remote's authoritative value.
    ///
    /// If the id is not present in the cache the cache update is silently
    /// skipped even though the remote call succeeded; the divergence heals on
    /// the next [`list`](Self::list). Returns `None` on remote failure.
    pub async fn update(&self, transaction: Transaction) -> Option<Transaction> {
        let updated = match self.remote.update(&transaction).await {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!("update was not applied: {e}");
                return None;
            }
        };

        let mut transactions = self.cache.load().await;
        match transactions.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated.clone();
                self.commit(&transactions).await;
            }
            None => debug!(
                "updated transaction {} is not in the cache; skipping",
                updated.id
            ),
        }
        Some(updated)
    }

    /// Deletes the transaction with this id from the remote source and then
    /// from the cache. Returns false (with the cache untouched) on failure.
    pub async fn delete(&self, id: &str) -> bool {
        if let Err(e) = self.remote.delete(id).await {
            warn!("delete was not applied: {e}");
            return false;
        }

        let mut transactions = self.cache.load().await;
        transactions.retain(|t| t.id != id);
        self.commit(&transactions).await;
        true
    }

    /// Registers an observer and returns its id.
    ///
    /// Registration is append-only with no deduplication; subscribe twice and
    /// you will be called twice. Callers are responsible for unsubscribing
    /// (e.g. when a view is torn down) to avoid unbounded growth. Callbacks
    /// run with the registry locked, so they must not subscribe or
    /// unsubscribe from within.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&[Transaction]) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.observers_guard().push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Reconciliations completing after this call will
    /// not reach it. In-flight fetches are not aborted.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers_guard().retain(|(sub, _)| *sub != id);
    }

    /// Spawns a self-rescheduling task that revalidates every `period`,
    /// independent of any read. Abort the handle to stop it.
    pub fn spawn_periodic(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.revalidate().await;
            }
        })
    }

    /// The time the cache was last persisted, if ever.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.cache.last_sync().await
    }

    /// Persists the collection, then notifies observers. Never the other way
    /// around: a notification always describes durably persisted state. A
    /// persistence failure is absorbed so that the remote operation that led
    /// here still takes effect in process.
    async fn commit(&self, transactions: &[Transaction]) {
        if let Err(e) = self.cache.save(transactions).await {
            warn!("unable to persist the transaction cache: {e:#}");
        }
        for (_, observer) in self.observers_guard().iter() {
            observer(transactions);
        }
    }

    fn observers_guard(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Order-sensitive structural equality of two collections, compared in their
/// serialized form.
fn same_collection(a: &[Transaction], b: &[Transaction]) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
