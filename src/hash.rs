// src/hash.rs

//! SHA-256 hashing for lookaside source fingerprints
//!
//! Sources excluded from git are identified by the SHA-256 of their
//! content. The [`Hasher`] accumulator is allocated when a source is
//! classified and fed later, once the bytes are known.

use sha2::{Digest, Sha256};
use std::fmt;

/// A finished SHA-256 digest, stored as lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    value: String,
}

impl Hash {
    /// Get the hash value as a hex string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Format as a prefixed string (e.g., "sha256:abc123...")
    pub fn to_prefixed_string(&self) -> String {
        format!("sha256:{}", self.value)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Incremental SHA-256 accumulator
#[derive(Clone, Default)]
pub struct Hasher {
    state: Sha256,
    consumed: u64,
}

impl Hasher {
    /// Create a fresh, unseeded hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
        self.consumed += data.len() as u64;
    }

    /// Number of bytes fed so far
    #[inline]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Finalize and return the hash
    pub fn finalize(self) -> Hash {
        Hash {
            value: format!("{:x}", self.state.finalize()),
        }
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &"sha256")
            .field("consumed", &self.consumed)
            .finish()
    }
}

/// Compute hash of a byte slice
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
