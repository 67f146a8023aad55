use modular_bitfield::bitfield;
use modular_bitfield::prelude::B7;

/// Per-node metadata byte. Only the delete flag is in use.
#[bitfield(bits = 8)]
#[derive(Clone, Copy)]
pub struct NodeMeta {
    deleted: bool,
    #[skip]
    __: B7,
}

pub(crate) type Link = Option<Box<Node>>;

/// A key/value pair in a bucket chain. Each node owns its successor.
pub(crate) struct Node {
    key: Box<[u8]>,
    value: Box<[u8]>,
    meta: NodeMeta,
    pub(super) next: Link,
}

impl Node {
    pub fn new(key: &[u8], value: &[u8]) -> Box<Self> {
        Box::new(Self {
            key: key.into(),
            value: value.into(),
            meta: NodeMeta::new(),
            next: None,
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_deleted(&self) -> bool {
        self.meta.deleted()
    }

    pub fn mark_deleted(&mut self) {
        self.meta.set_deleted(true);
    }

    pub fn set_value(&mut self, value: &[u8]) {
        self.value = value.into();
    }

    /// Clears the delete flag and installs a fresh value.
    pub fn revive(&mut self, value: &[u8]) {
        self.meta.set_deleted(false);
        self.set_value(value);
    }

    /// Detaches and returns the rest of the chain.
    pub fn take_next(&mut self) -> Link {
        self.next.take()
    }
}

impl Drop for Node {
    // unlink iteratively so long chains don't recurse on drop
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}
