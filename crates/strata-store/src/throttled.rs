use strata_types::{Chunk, ContentHash};

use crate::error::StoreResult;
use crate::traits::{ChunkStore, PutOutcome};

/// Admission limit in front of another store.
///
/// Each `put_many` call persists at most `max_chunks_per_put` chunks from the
/// front of its batch and reports the remainder as backpressure. Reads and root
/// operations pass straight through.
#[derive(Debug)]
pub struct ThrottledStore<S> {
    inner: S,
    max_chunks_per_put: usize,
}

impl<S: ChunkStore> ThrottledStore<S> {
    /// A limit of zero is treated as one so every call makes progress.
    pub fn new(inner: S, max_chunks_per_put: usize) -> Self {
        Self {
            inner,
            max_chunks_per_put: max_chunks_per_put.max(1),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn max_chunks_per_put(&self) -> usize {
        self.max_chunks_per_put
    }
}

impl<S: ChunkStore> ChunkStore for ThrottledStore<S> {
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>> {
        self.inner.get(hash)
    }

    fn has(&self, hash: &ContentHash) -> StoreResult<bool> {
        self.inner.has(hash)
    }

    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome> {
        if chunks.len() <= self.max_chunks_per_put {
            return self.inner.put_many(chunks);
        }
        let (admitted, deferred) = chunks.split_at(self.max_chunks_per_put);
        let mut rejected = match self.inner.put_many(admitted)? {
            PutOutcome::Accepted => Vec::with_capacity(deferred.len()),
            PutOutcome::Backpressure(rejected) => rejected,
        };
        rejected.extend(deferred.iter().map(Chunk::hash));
        tracing::debug!(
            admitted = admitted.len(),
            rejected = rejected.len(),
            "write throttled"
        );
        Ok(PutOutcome::Backpressure(rejected))
    }

    fn root(&self) -> StoreResult<ContentHash> {
        self.inner.root()
    }

    fn compare_and_swap_root(
        &self,
        current: ContentHash,
        proposed: ContentHash,
    ) -> StoreResult<bool> {
        self.inner.compare_and_swap_root(current, proposed)
    }
}
