use std::ops::Deref;

use chainmap::ChainedMap;
use parking_lot::{MappedRwLockReadGuard, RwLockReadGuard};

/// A value borrowed straight out of the table.
///
/// Holds the table's read lock until dropped, so writers and resizes wait on it.
pub struct ValueRef<'a> {
    pub(crate) value: MappedRwLockReadGuard<'a, [u8]>,
}

impl<'a> ValueRef<'a> {
    pub(crate) fn new_from_key(key: &[u8], map: RwLockReadGuard<'a, ChainedMap>) -> Option<Self> {
        RwLockReadGuard::try_map(map, |map| map.get(key))
            .ok()
            .map(|value| Self { value })
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl Deref for ValueRef<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
