use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::capacity::{growth_capacity, select_capacity};
use crate::chain::{Buckets, Probe, PutOutcome};
use crate::config::TableConfig;
use crate::error::{Absence, Result, TableError};
use crate::hasher::HashKeys;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    /// live key/value pairs
    items: u64,
    /// nodes in memory, including logically deleted ones
    physical: u64,
}

/// State of an in-progress resize. Slots of the active array below `cursor`
/// have already been moved into `buckets`.
struct Migration {
    buckets: Buckets,
    cursor: usize,
    counts: Counts,
    moved: u64,
    purged: u64,
    started: Instant,
}

impl Migration {
    fn new(capacity: usize) -> Self {
        Self {
            buckets: Buckets::new(capacity),
            cursor: 0,
            counts: Counts::default(),
            moved: 0,
            purged: 0,
            started: Instant::now(),
        }
    }
}

/// Snapshot of how far a pending resize has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeProgress {
    /// Active array slots already moved to the new array.
    pub migrated_slots: u64,
    /// Length of the active array.
    pub total_slots: u64,
    /// Length of the array being filled.
    pub target_capacity: u64,
}

fn slot_for(hash: u64, buckets: &Buckets) -> usize {
    (hash % buckets.capacity() as u64) as usize
}

/// A single-threaded open chained hash map over byte keys and values.
///
/// Every bucket holds a chain sorted by key. Deletes only flag the node; the
/// node is dropped the next time a resize migrates its bucket. Resizes run
/// bucket by bucket into a second array and can be spread across many calls
/// with [`ChainedMap::resize_partial`]. While one is pending, keys whose old
/// bucket has been migrated are served from the new array.
pub struct ChainedMap {
    buckets: Buckets,
    counts: Counts,
    migration: Option<Migration>,
    // set while resize_full/resize_partial is running
    resize_running: bool,
    keys: HashKeys,
    max_capacity: u64,
}

impl ChainedMap {
    /// Creates a map with at least `initial_capacity` buckets and random hash keys.
    pub fn new(initial_capacity: u64) -> Result<Self> {
        Self::with_config(TableConfig::new().with_initial_capacity(initial_capacity))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let keys = match config.hash_keys() {
            Some(keys) => keys,
            None => HashKeys::generate()?,
        };
        let capacity = select_capacity(config.initial_capacity(), config.max_capacity());

        Ok(Self {
            buckets: Buckets::new(capacity as usize),
            counts: Counts::default(),
            migration: None,
            resize_running: false,
            keys,
            max_capacity: config.max_capacity(),
        })
    }

    /// Number of live key/value pairs.
    pub fn len(&self) -> u64 {
        self.counts.items + self.migration.as_ref().map_or(0, |m| m.counts.items)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in memory, logically deleted ones included.
    pub fn load(&self) -> u64 {
        self.counts.physical + self.migration.as_ref().map_or(0, |m| m.counts.physical)
    }

    /// Length of the active bucket array.
    pub fn capacity(&self) -> u64 {
        self.buckets.capacity() as u64
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    /// `load / capacity`, measured against the active array only.
    pub fn load_factor(&self) -> f64 {
        self.load() as f64 / self.capacity() as f64
    }

    /// True while a resize array exists, i.e. a resize has started but not finished.
    pub fn is_resizing(&self) -> bool {
        self.migration.is_some()
    }

    pub fn resize_progress(&self) -> Option<ResizeProgress> {
        self.migration.as_ref().map(|m| ResizeProgress {
            migrated_slots: m.cursor as u64,
            total_slots: self.capacity(),
            target_capacity: m.buckets.capacity() as u64,
        })
    }

    /// Picks the array that currently owns `key` and its slot there.
    fn locate(&self, key: &[u8]) -> (&Buckets, usize) {
        let hash = self.keys.hash(key);
        let slot = slot_for(hash, &self.buckets);
        match &self.migration {
            Some(m) if slot < m.cursor => (&m.buckets, slot_for(hash, &m.buckets)),
            _ => (&self.buckets, slot),
        }
    }

    fn locate_mut(&mut self, key: &[u8]) -> (&mut Buckets, &mut Counts, usize) {
        let hash = self.keys.hash(key);
        let slot = slot_for(hash, &self.buckets);
        match &mut self.migration {
            Some(m) if slot < m.cursor => {
                let new_slot = slot_for(hash, &m.buckets);
                (&mut m.buckets, &mut m.counts, new_slot)
            }
            _ => (&mut self.buckets, &mut self.counts, slot),
        }
    }

    /// Inserts `key` or overwrites its value. A logically deleted key comes back to life.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        let (buckets, counts, slot) = self.locate_mut(key);
        match buckets.upsert(slot, key, value) {
            PutOutcome::Inserted => {
                counts.items += 1;
                counts.physical += 1;
            }
            PutOutcome::Revived => counts.items += 1,
            PutOutcome::Updated => {}
        }
    }

    /// Returns the live value for `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let (buckets, slot) = self.locate(key);
        match buckets.probe(slot, key) {
            Probe::Live(value) => Some(value),
            Probe::Deleted | Probe::Absent => None,
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Flags `key` as deleted. The node stays in memory until the next resize.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let (buckets, counts, slot) = self.locate_mut(key);
        match buckets.find_mut(slot, key) {
            Some(node) if node.is_deleted() => {
                Err(TableError::key_not_found(key, Absence::Deleted))
            }
            Some(node) => {
                node.mark_deleted();
                counts.items -= 1;
                Ok(())
            }
            None => Err(TableError::key_not_found(key, Absence::Missing)),
        }
    }

    /// Grows the map until its load factor is at most `target_load_factor`,
    /// migrating every bucket before returning.
    ///
    /// A resize left pending by [`ChainedMap::resize_partial`] is finished
    /// instead, and `target_load_factor` is ignored.
    pub fn resize_full(&mut self, target_load_factor: f64) -> Result<()> {
        if !self.begin_resize(target_load_factor)? {
            return Ok(());
        }
        while self.migrate_next_slot() {}
        self.finish_resize();
        self.resize_running = false;
        Ok(())
    }

    /// Like [`ChainedMap::resize_full`] but stops once `budget` has elapsed,
    /// returning `Ok(false)`. Progress is kept and the next call picks it up.
    ///
    /// The budget is only checked between buckets, so one long chain can
    /// overrun it. At least one bucket is migrated per call.
    pub fn resize_partial(&mut self, budget: Duration, target_load_factor: f64) -> Result<bool> {
        let deadline = Instant::now().checked_add(budget);
        if !self.begin_resize(target_load_factor)? {
            return Ok(true);
        }

        let complete = loop {
            if !self.migrate_next_slot() {
                break true;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break self.migration_complete();
            }
        };

        if complete {
            self.finish_resize();
        } else if let Some(progress) = self.resize_progress() {
            trace!(
                "partial resize yielded at slot {}/{}",
                progress.migrated_slots, progress.total_slots
            );
        }
        self.resize_running = false;
        Ok(complete)
    }

    /// Validates a resize request and makes sure a resize array exists.
    ///
    /// Returns `false` when the map is already under the target load factor
    /// and nothing needs to move.
    fn begin_resize(&mut self, target_load_factor: f64) -> Result<bool> {
        if self.resize_running {
            return Err(TableError::ResizeInProgress);
        }
        let capacity = self.capacity();
        if capacity >= self.max_capacity {
            return Err(TableError::AtMaxCapacity { capacity });
        }

        match &self.migration {
            Some(m) => {
                debug!(
                    "resuming resize to capacity {} at slot {}/{}, target load factor {} ignored",
                    m.buckets.capacity(),
                    m.cursor,
                    capacity,
                    target_load_factor
                );
            }
            None => {
                if self.load_factor() <= target_load_factor {
                    return Ok(false);
                }
                // deleted nodes are not migrated, so size for the live ones
                let new_capacity =
                    growth_capacity(self.counts.items, target_load_factor, self.max_capacity)
                        .max(capacity);
                debug!("starting resize from capacity {capacity} to {new_capacity}");
                self.migration = Some(Migration::new(new_capacity as usize));
            }
        }

        self.resize_running = true;
        Ok(true)
    }

    /// Moves the chain under the cursor into the resize array, dropping
    /// deleted nodes. Returns `false` if there was no slot left to move.
    fn migrate_next_slot(&mut self) -> bool {
        let Some(migration) = self.migration.as_mut() else {
            return false;
        };
        if migration.cursor >= self.buckets.capacity() {
            return false;
        }

        let mut chain = self.buckets.take_chain(migration.cursor);
        while let Some(mut node) = chain {
            chain = node.take_next();
            self.counts.physical -= 1;
            if node.is_deleted() {
                migration.purged += 1;
                continue;
            }

            self.counts.items -= 1;
            let slot = slot_for(self.keys.hash(node.key()), &migration.buckets);
            if migration.buckets.splice(slot, node) {
                migration.counts.items += 1;
                migration.counts.physical += 1;
                migration.moved += 1;
            }
        }
        migration.cursor += 1;
        true
    }

    fn migration_complete(&self) -> bool {
        self.migration
            .as_ref()
            .is_some_and(|m| m.cursor >= self.buckets.capacity())
    }

    /// Swaps the filled resize array in and folds its counters into the active side.
    fn finish_resize(&mut self) {
        let Some(migration) = self.migration.take() else {
            return;
        };
        let old_capacity = self.capacity();
        self.buckets = migration.buckets;
        self.counts.items += migration.counts.items;
        self.counts.physical += migration.counts.physical;
        debug!(
            "resize from capacity {} to {} complete: {} moved, {} purged in {:?}",
            old_capacity,
            self.capacity(),
            migration.moved,
            migration.purged,
            migration.started.elapsed()
        );
    }
}
