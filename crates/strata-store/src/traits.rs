use strata_types::{Chunk, ContentHash};

use crate::error::StoreResult;

/// Result of a batched write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    /// Every chunk in the batch is durable.
    Accepted,
    /// The store persisted only part of the batch. The listed hashes were not
    /// written and must be resubmitted by the caller.
    Backpressure(Vec<ContentHash>),
}

impl PutOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Hashes the store refused, empty when everything was accepted.
    pub fn rejected(&self) -> &[ContentHash] {
        match self {
            Self::Accepted => &[],
            Self::Backpressure(rejected) => rejected,
        }
    }
}

/// Content-addressed chunk store with a single compare-and-swap root.
///
/// All implementations must satisfy these invariants:
/// - Chunks are immutable once written. Writing a chunk that is already
///   present leaves its content unchanged.
/// - `put_many` either accepts the whole batch or names every chunk it did
///   not persist. Chunks it accepted are durable when it returns.
/// - The root only changes through `compare_and_swap_root`, atomically with
///   respect to every other root operation.
pub trait ChunkStore: Send + Sync {
    /// Read a chunk by hash. Returns `Ok(None)` if it is not present.
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>>;

    /// Check whether a chunk is present.
    fn has(&self, hash: &ContentHash) -> StoreResult<bool>;

    /// Write a batch of chunks in order.
    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome>;

    /// Current root, or the empty hash if it was never set.
    fn root(&self) -> StoreResult<ContentHash>;

    /// Replace the root with `proposed` iff it currently equals `current`.
    ///
    /// Returns `Ok(false)` without modifying anything when the root has moved.
    fn compare_and_swap_root(&self, current: ContentHash, proposed: ContentHash)
        -> StoreResult<bool>;

    /// Write a single chunk.
    fn put(&self, chunk: &Chunk) -> StoreResult<PutOutcome> {
        self.put_many(std::slice::from_ref(chunk))
    }

    /// Read several chunks. Default implementation calls `get()` for each hash.
    fn get_many(&self, hashes: &[ContentHash]) -> StoreResult<Vec<Option<Chunk>>> {
        hashes.iter().map(|hash| self.get(hash)).collect()
    }
}

impl<S: ChunkStore + ?Sized> ChunkStore for std::sync::Arc<S> {
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>> {
        (**self).get(hash)
    }

    fn has(&self, hash: &ContentHash) -> StoreResult<bool> {
        (**self).has(hash)
    }

    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome> {
        (**self).put_many(chunks)
    }

    fn root(&self) -> StoreResult<ContentHash> {
        (**self).root()
    }

    fn compare_and_swap_root(
        &self,
        current: ContentHash,
        proposed: ContentHash,
    ) -> StoreResult<bool> {
        (**self).compare_and_swap_root(current, proposed)
    }
}
