use std::hash::Hasher;

use rand::TryRngCore;
use rand::rngs::OsRng;
use siphasher::sip::SipHasher24;

use crate::error::{Result, TableError};

/// The two 64 bit SipHash keys a map hashes with for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashKeys {
    k0: u64,
    k1: u64,
}

impl HashKeys {
    pub fn new(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }

    /// Draws both keys from the operating system's secure random source.
    pub fn generate() -> Result<Self> {
        let mut keys = [0u64; 2];
        OsRng
            .try_fill_bytes(bytemuck::bytes_of_mut(&mut keys))
            .map_err(|e| TableError::KeyGeneration(e.to_string()))?;
        Ok(Self::new(keys[0], keys[1]))
    }

    /// SipHash-2-4 of the raw key bytes.
    pub fn hash(&self, bytes: &[u8]) -> u64 {
        let mut hasher = SipHasher24::new_with_keys(self.k0, self.k1);
        hasher.write(bytes);
        hasher.finish()
    }
}
