//! Keyed snapshot topics.

use super::{CollectionKind, KeyedLocks, Subscription};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::debug;

/// Callback receiving the full current collection.
pub type SnapshotCallback<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

/// Registry of snapshot callbacks for one collection kind.
///
/// Deliveries for the same key are serialized and every delivery loads its
/// snapshot while holding the key, so subscribers observe snapshots in the
/// order the underlying writes committed. Keys are independent.
pub struct Topic<K, T> {
    inner: Arc<TopicInner<K, T>>,
}

struct TopicInner<K, T> {
    kind: CollectionKind,
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<K, Vec<(u64, SnapshotCallback<T>)>>>,
    delivery: KeyedLocks<K>,
}

impl<K, T> TopicInner<K, T>
where
    K: Eq + Hash,
{
    fn callbacks_for(&self, key: &K) -> Vec<SnapshotCallback<T>> {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers
            .get(key)
            .map(|entries| entries.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    fn remove(&self, key: &K, id: u64) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = subscribers.get_mut(key) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                subscribers.remove(key);
            }
        }
    }
}

impl<K, T> Topic<K, T>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Creates an empty topic for `kind`.
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            inner: Arc::new(TopicInner {
                kind,
                next_id: AtomicU64::new(0),
                subscribers: Mutex::new(HashMap::new()),
                delivery: KeyedLocks::new(),
            }),
        }
    }

    /// Returns the collection kind this topic carries.
    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        self.inner.kind
    }

    /// Registers `callback` for `key` and immediately delivers the snapshot
    /// produced by `load` to it.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; the callback is not registered in that
    /// case.
    pub async fn subscribe<F, Fut, E>(
        &self,
        key: K,
        callback: SnapshotCallback<T>,
        load: F,
    ) -> Result<Subscription, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let _turn = self.inner.delivery.lock(key.clone()).await;
        let snapshot = load().await?;
        callback(&snapshot);

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut subscribers = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers
                .entry(key.clone())
                .or_default()
                .push((id, callback));
        }
        debug!(kind = %self.inner.kind, key = %key, subscription = id, "subscriber registered");

        let weak: Weak<TopicInner<K, T>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(self.inner.kind, move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(&key, id);
            }
        }))
    }

    /// Delivers the snapshot produced by `load` to every subscriber of
    /// `key`, returning how many callbacks ran.
    ///
    /// The loader is skipped when nobody is subscribed.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; no callback runs in that case.
    pub async fn publish<F, Fut, E>(&self, key: &K, load: F) -> Result<usize, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let _turn = self.inner.delivery.lock(key.clone()).await;
        let callbacks = self.inner.callbacks_for(key);
        if callbacks.is_empty() {
            return Ok(0);
        }

        let snapshot = load().await?;
        for callback in &callbacks {
            callback(&snapshot);
        }
        debug!(
            kind = %self.inner.kind,
            key = %key,
            subscribers = callbacks.len(),
            items = snapshot.len(),
            "snapshot delivered"
        );
        Ok(callbacks.len())
    }

    /// Returns the number of live subscribers for `key`.
    #[must_use]
    pub fn subscriber_count(&self, key: &K) -> usize {
        self.inner.callbacks_for(key).len()
    }
}

impl<K, T> Clone for Topic<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> fmt::Debug for Topic<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("kind", &self.inner.kind)
            .finish_non_exhaustive()
    }
}
