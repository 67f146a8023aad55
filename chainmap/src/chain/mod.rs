use std::cmp::Ordering;

pub(crate) mod node;

pub(crate) use node::{Link, Node};

/// Result of looking a key up in a chain.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Probe<'a> {
    Live(&'a [u8]),
    Deleted,
    Absent,
}

/// What an upsert did to the chain, so the caller can keep its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PutOutcome {
    /// A new node was linked in.
    Inserted,
    /// A live node had its value replaced.
    Updated,
    /// A logically deleted node was brought back with the new value.
    Revived,
}

/// A fixed length array of chain heads.
///
/// Every chain is kept sorted by key (byte-lexicographic), which lets
/// lookups stop as soon as they walk past the position the key would occupy.
pub(crate) struct Buckets {
    slots: Box<[Link]>,
}

impl Buckets {
    pub fn new(capacity: usize) -> Self {
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn probe(&self, slot: usize, key: &[u8]) -> Probe<'_> {
        let mut cur = self.slots[slot].as_deref();
        while let Some(node) = cur {
            match key.cmp(node.key()) {
                Ordering::Greater => cur = node.next.as_deref(),
                Ordering::Equal if node.is_deleted() => return Probe::Deleted,
                Ordering::Equal => return Probe::Live(node.value()),
                Ordering::Less => break,
            }
        }
        Probe::Absent
    }

    /// Finds the node holding `key`, deleted or not.
    pub fn find_mut(&mut self, slot: usize, key: &[u8]) -> Option<&mut Node> {
        let mut cur = self.slots[slot].as_deref_mut();
        while let Some(node) = cur {
            match key.cmp(node.key()) {
                Ordering::Greater => cur = node.next.as_deref_mut(),
                Ordering::Equal => return Some(node),
                Ordering::Less => return None,
            }
        }
        None
    }

    /// Returns the first link in the chain whose node is not ordered before `key`.
    fn seek(&mut self, slot: usize, key: &[u8]) -> &mut Link {
        let mut link = &mut self.slots[slot];
        while link.as_ref().is_some_and(|node| node.key() < key) {
            link = &mut link.as_mut().expect("link checked non-empty").next;
        }
        link
    }

    /// Inserts or overwrites `key`, keeping the chain ordered.
    pub fn upsert(&mut self, slot: usize, key: &[u8], value: &[u8]) -> PutOutcome {
        let link = self.seek(slot, key);
        match link {
            Some(node) if node.key() == key => {
                if node.is_deleted() {
                    node.revive(value);
                    PutOutcome::Revived
                } else {
                    node.set_value(value);
                    PutOutcome::Updated
                }
            }
            _ => {
                let mut node = Node::new(key, value);
                node.next = link.take();
                *link = Some(node);
                PutOutcome::Inserted
            }
        }
    }

    /// Links an already built node into its ordered position without copying it.
    ///
    /// Returns `false`, dropping `node`, if the chain already holds its key.
    pub fn splice(&mut self, slot: usize, mut node: Box<Node>) -> bool {
        let link = self.seek(slot, node.key());
        if link
            .as_ref()
            .is_some_and(|existing| existing.key() == node.key())
        {
            return false;
        }
        node.next = link.take();
        *link = Some(node);
        true
    }

    /// Removes a whole chain from its slot.
    pub fn take_chain(&mut self, slot: usize) -> Link {
        self.slots[slot].take()
    }

    #[cfg(test)]
    pub fn chain_keys(&self, slot: usize) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        let mut cur = self.slots[slot].as_deref();
        while let Some(node) = cur {
            keys.push(node.key().to_vec());
            cur = node.next.as_deref();
        }
        keys
    }
}
