use crate::capacity::{MAX_CAPACITY, MIN_CAPACITY};
use crate::error::{Result, TableError};
use crate::hasher::HashKeys;

/// Construction parameters for a [`ChainedMap`](crate::ChainedMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    initial_capacity: u64,
    max_capacity: u64,
    hash_keys: Option<HashKeys>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            max_capacity: MAX_CAPACITY,
            hash_keys: None,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested bucket count; the map rounds it up to a prime.
    pub fn with_initial_capacity(mut self, capacity: u64) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Upper bound on the bucket count, must be at least `MIN_CAPACITY`.
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Fixes the SipHash keys instead of drawing them from the OS.
    /// Intended for reproducible layouts in tests and benchmarks.
    pub fn with_hash_keys(mut self, k0: u64, k1: u64) -> Self {
        self.hash_keys = Some(HashKeys::new(k0, k1));
        self
    }

    pub fn initial_capacity(&self) -> u64 {
        self.initial_capacity
    }

    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    pub(crate) fn hash_keys(&self) -> Option<HashKeys> {
        self.hash_keys
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_capacity < MIN_CAPACITY {
            return Err(TableError::InvalidConfig(format!(
                "max capacity {} is below the minimum capacity {}",
                self.max_capacity, MIN_CAPACITY
            )));
        }
        if usize::try_from(self.max_capacity).is_err() {
            return Err(TableError::InvalidConfig(format!(
                "max capacity {} does not fit in this platform's address space",
                self.max_capacity
            )));
        }
        Ok(())
    }
}
