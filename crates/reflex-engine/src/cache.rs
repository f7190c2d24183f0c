//! TTL- and size-bounded concurrent cache
//!
//! Entries are write-once: reads never refresh the insertion instant. A
//! background sweeper thread drops expired entries every [`SWEEP_PERIOD`];
//! [`TtlCache::cleanup`] runs the same sweep synchronously.
//!
//! Capacity eviction removes the single oldest entry by a linear scan. Under
//! concurrent inserts the scan may lose the race to another evictor, so the
//! bound is approximate.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::member::Member;

/// Default entry time-to-live
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default maximum number of entries
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Background sweep period, independent of the TTL
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Whole milliseconds in `d`, saturating at `u64::MAX`
pub(crate) fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Cache of resolved members
pub type MemberCache = TtlCache<Member>;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted: Instant,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted: Instant::now(),
        }
    }
}

struct Store<V> {
    map: DashMap<String, Entry<V>>,
    ttl_ms: AtomicU64,
    max_size: AtomicUsize,
}

impl<V: Clone> Store<V> {
    fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms.load(Ordering::Relaxed))
    }

    /// Remove every entry older than the TTL
    fn sweep(&self) -> usize {
        let ttl = self.ttl();
        let before = self.map.len();
        self.map.retain(|_, entry| entry.inserted.elapsed() <= ttl);
        before.saturating_sub(self.map.len())
    }

    /// Make room for one new entry by dropping the oldest
    fn evict_for_insert(&self) {
        if self.map.len() < self.max_size.load(Ordering::Relaxed) {
            return;
        }
        let oldest = self
            .map
            .iter()
            .min_by_key(|e| e.value().inserted)
            .map(|e| (e.key().clone(), e.value().inserted));
        if let Some((key, inserted)) = oldest {
            // A concurrent put may have replaced the entry; only drop it if unchanged.
            if self.map.remove_if(&key, |_, e| e.inserted == inserted).is_some() {
                debug!(key = %key, "evicted oldest cache entry");
            }
        }
    }
}

struct Sweeper {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}

/// Concurrent key → value cache with TTL and capacity bounds
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    store: Arc<Store<V>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create a cache with default TTL and capacity
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_MAX_SIZE)
    }

    /// Create a cache with the given TTL and capacity
    pub fn with_limits(ttl: Duration, max_size: usize) -> Self {
        let store = Arc::new(Store {
            map: DashMap::new(),
            ttl_ms: AtomicU64::new(duration_millis(ttl)),
            max_size: AtomicUsize::new(max_size),
        });
        let sweeper = Self::start_sweeper(Arc::downgrade(&store));
        Self {
            store,
            sweeper: Mutex::new(sweeper),
        }
    }

    fn start_sweeper(store: Weak<Store<V>>) -> Option<Sweeper> {
        let (stop, stopped) = channel::bounded::<()>(1);
        let spawned = thread::Builder::new()
            .name("reflex-cache-sweeper".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(SWEEP_PERIOD) {
                    Err(RecvTimeoutError::Timeout) => {
                        let Some(store) = store.upgrade() else {
                            break;
                        };
                        let removed = store.sweep();
                        if removed > 0 {
                            debug!(removed, "cache sweep removed expired entries");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(handle) => Some(Sweeper { stop, handle }),
            Err(e) => {
                warn!(error = %e, "failed to spawn cache sweeper; expired entries are only removed by cleanup()");
                None
            }
        }
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.store.map.get(key).map(|e| e.value.clone());
        trace!(key, hit = value.is_some(), "cache get");
        value
    }

    /// Insert or overwrite; returns the previous value
    ///
    /// When the key is new and the cache is full, the oldest entry goes first.
    pub fn put(&self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if !self.store.map.contains_key(&key) {
            self.store.evict_for_insert();
        }
        self.store.map.insert(key, Entry::new(value)).map(|e| e.value)
    }

    /// Insert only if the key is absent
    ///
    /// Returns the value already present, or `None` if `value` was stored.
    pub fn put_if_absent(&self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(existing) = self.store.map.get(&key) {
            return Some(existing.value.clone());
        }
        self.store.evict_for_insert();
        match self.store.map.entry(key) {
            MapEntry::Occupied(e) => Some(e.get().value.clone()),
            MapEntry::Vacant(e) => {
                e.insert(Entry::new(value));
                None
            }
        }
    }

    /// Replace the value of an existing key; returns the previous value
    pub fn replace(&self, key: &str, value: V) -> Option<V> {
        let mut entry = self.store.map.get_mut(key)?;
        let previous = std::mem::replace(&mut *entry, Entry::new(value));
        Some(previous.value)
    }

    /// Remove a key; returns its value
    pub fn remove(&self, key: &str) -> Option<V> {
        self.store.map.remove(key).map(|(_, e)| e.value)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.store.map.contains_key(key)
    }

    /// Insert every pair
    pub fn put_all<K, I>(&self, entries: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.store.map.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.store.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.store.map.is_empty()
    }

    /// Snapshot of the keys
    pub fn keys(&self) -> Vec<String> {
        self.store.map.iter().map(|e| e.key().clone()).collect()
    }

    /// Snapshot of the values
    pub fn values(&self) -> Vec<V> {
        self.store.map.iter().map(|e| e.value().value.clone()).collect()
    }

    /// Snapshot of the key/value pairs
    pub fn entries(&self) -> Vec<(String, V)> {
        self.store
            .map
            .iter()
            .map(|e| (e.key().clone(), e.value().value.clone()))
            .collect()
    }

    /// Current time-to-live
    pub fn ttl(&self) -> Duration {
        self.store.ttl()
    }

    /// Current capacity
    pub fn max_size(&self) -> usize {
        self.store.max_size.load(Ordering::Relaxed)
    }

    /// Set the time-to-live; applies to existing entries at the next sweep
    pub fn set_ttl(&self, ttl: Duration) -> &Self {
        self.store.ttl_ms.store(duration_millis(ttl), Ordering::Relaxed);
        self
    }

    /// Set the capacity; existing entries are kept until the next insert
    pub fn set_max_size(&self, max_size: usize) -> &Self {
        self.store.max_size.store(max_size, Ordering::Relaxed);
        self
    }

    /// Sweep expired entries now; returns how many were removed
    pub fn cleanup(&self) -> usize {
        let removed = self.store.sweep();
        trace!(removed, "cache cleanup");
        removed
    }

    /// Sweep once more and stop the background sweeper
    ///
    /// The cache stays usable; only automatic sweeps stop.
    pub fn shutdown(&self) {
        self.cleanup();
        if let Some(sweeper) = self.sweeper.lock().take() {
            let _ = sweeper.stop.send(());
            if sweeper.handle.join().is_err() {
                warn!("cache sweeper thread panicked");
            }
        }
    }

    /// Check if the background sweeper is running
    pub fn is_running(&self) -> bool {
        self.sweeper.lock().is_some()
    }
}

impl<V: Clone + PartialEq + Send + Sync + 'static> TtlCache<V> {
    /// Replace only if the current value equals `expected`
    pub fn replace_if(&self, key: &str, expected: &V, value: V) -> bool {
        match self.store.map.get_mut(key) {
            Some(mut entry) if entry.value == *expected => {
                *entry = Entry::new(value);
                true
            }
            _ => false,
        }
    }

    /// Remove only if the current value equals `expected`
    pub fn remove_if(&self, key: &str, expected: &V) -> bool {
        self.store.map.remove_if(key, |_, e| e.value == *expected).is_some()
    }

    /// Check if any entry holds `value`
    pub fn contains_value(&self, value: &V) -> bool {
        self.store.map.iter().any(|e| e.value().value == *value)
    }
}

impl<V: Clone + Send + Sync + 'static> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> Drop for TtlCache<V> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.len())
            .field("ttl", &self.ttl())
            .field("max_size", &self.max_size())
            .finish()
    }
}
