use std::time::{Duration, Instant};

use chainmap::ChainedMap;
use log::trace;
use parking_lot::RwLock;

mod refs;

pub use chainmap::{
    Absence, MAX_CAPACITY, MIN_CAPACITY, ResizeProgress, Result, TableConfig, TableError,
};
pub use refs::ValueRef;

/// A thread-safe chained hash map for byte keys and values.
///
/// One readers-writer lock guards the whole table. Lookups share it; puts,
/// deletes and resizes hold it exclusively for their full duration, so a
/// resize never interleaves with another operation. Resizing never happens
/// on its own: callers either run [`ChainedHashTable::resize_full`] or spread
/// the work with repeated [`ChainedHashTable::resize_partial`] calls.
pub struct ChainedHashTable {
    inner: RwLock<ChainedMap>,
}

impl ChainedHashTable {
    /// Create a table with at least `initial_capacity` buckets and random hash keys.
    pub fn new(initial_capacity: u64) -> Result<Self> {
        Ok(Self::from(ChainedMap::new(initial_capacity)?))
    }

    /// Create a table from an explicit configuration.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self::from(ChainedMap::with_config(config)?))
    }

    /// Insert a key-value pair, replacing the value of an existing key.
    pub fn put<K: AsRef<[u8]>, V: AsRef<[u8]>>(&self, key: K, value: V) {
        self.inner.write().put(key.as_ref(), value.as_ref());
    }

    /// Get a copy of the value stored for a key.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<Vec<u8>> {
        self.inner.read().get(key.as_ref()).map(<[u8]>::to_vec)
    }

    /// Borrow the value stored for a key without copying it.
    /// The read lock is held until the returned reference is dropped.
    pub fn get_ref<K: AsRef<[u8]>>(&self, key: K) -> Option<ValueRef<'_>> {
        ValueRef::new_from_key(key.as_ref(), self.inner.read())
    }

    /// Check if the table contains a live entry for a key.
    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.inner.read().contains_key(key.as_ref())
    }

    /// Mark a key as deleted.
    pub fn delete<K: AsRef<[u8]>>(&self, key: K) -> Result<()> {
        self.inner.write().delete(key.as_ref())
    }

    /// Number of live entries, counting both arrays during a resize.
    pub fn len(&self) -> u64 {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Number of physical nodes, including logically deleted ones.
    pub fn load(&self) -> u64 {
        self.inner.read().load()
    }

    /// Length of the active bucket array.
    pub fn capacity(&self) -> u64 {
        self.inner.read().capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.inner.read().load_factor()
    }

    pub fn is_resizing(&self) -> bool {
        self.inner.read().is_resizing()
    }

    pub fn resize_progress(&self) -> Option<ResizeProgress> {
        self.inner.read().resize_progress()
    }

    /// Resize to `target_load_factor` in one go, holding the write lock throughout.
    pub fn resize_full(&self, target_load_factor: f64) -> Result<()> {
        let requested = Instant::now();
        let mut map = self.inner.write();
        trace!("resize_full acquired write lock after {:?}", requested.elapsed());
        map.resize_full(target_load_factor)
    }

    /// Resize for roughly `budget`, returning `Ok(true)` once the resize has finished.
    ///
    /// The budget starts counting after the write lock is acquired and is
    /// checked between buckets only.
    pub fn resize_partial(&self, budget: Duration, target_load_factor: f64) -> Result<bool> {
        let requested = Instant::now();
        let mut map = self.inner.write();
        trace!("resize_partial acquired write lock after {:?}", requested.elapsed());
        map.resize_partial(budget, target_load_factor)
    }

    /// Unwrap the single-threaded map.
    pub fn into_inner(self) -> ChainedMap {
        self.inner.into_inner()
    }
}

impl From<ChainedMap> for ChainedHashTable {
    fn from(map: ChainedMap) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }
}
