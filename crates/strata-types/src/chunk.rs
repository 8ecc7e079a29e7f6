use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::ContentHash;

/// Hashes a scheduler asserts are already durable at the store.
///
/// Ordered so that the set serializes identically on every run.
pub type Hints = BTreeSet<ContentHash>;

/// An immutable payload addressed by its content hash.
///
/// Only the payload goes over the wire; the hash is recomputed on decode, so a
/// deserialized chunk can never disagree with its own address.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct Chunk {
    hash: ContentHash,
    payload: Vec<u8>,
}

impl Chunk {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        Self {
            hash: ContentHash::of(&payload),
            payload,
        }
    }

    /// Build a chunk from a payload fetched under `expected`, rejecting it if
    /// the payload does not hash to that address.
    pub fn verified(expected: ContentHash, payload: impl Into<Vec<u8>>) -> Result<Self, TypeError> {
        let chunk = Self::new(payload);
        if chunk.hash != expected {
            return Err(TypeError::HashMismatch {
                expected,
                computed: chunk.hash,
            });
        }
        Ok(chunk)
    }

    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl From<Chunk> for Vec<u8> {
    fn from(chunk: Chunk) -> Self {
        chunk.payload
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("hash", &self.hash)
            .field("len", &self.payload.len())
            .finish()
    }
}
