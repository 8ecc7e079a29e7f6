//! Pending-write queue.
//!
//! Producers schedule chunks from any number of tasks; a flush drains the
//! whole queue in one step. The lock guards only the in-memory vector and is
//! never held across network I/O.

use std::collections::HashSet;

use parking_lot::Mutex;
use strata_types::{Chunk, ContentHash, Hints};

/// A chunk waiting to be flushed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub chunk: Chunk,
    /// Dependency depth: a chunk must not be assumed durable before chunks of
    /// lower height that it references.
    pub height: u64,
    /// Hashes asserted durable at the store when this write was scheduled.
    pub hints: Hints,
}

/// Ordered snapshot of pending writes, in scheduling order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    writes: Vec<PendingWrite>,
}

impl Batch {
    pub fn new(writes: Vec<PendingWrite>) -> Self {
        Self { writes }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    pub fn chunks(&self) -> Vec<Chunk> {
        self.writes.iter().map(|w| w.chunk.clone()).collect()
    }

    pub fn hashes(&self) -> impl Iterator<Item = ContentHash> + '_ {
        self.writes.iter().map(|w| w.chunk.hash())
    }

    /// Union of every write's hints.
    pub fn hints(&self) -> Hints {
        self.writes
            .iter()
            .flat_map(|w| w.hints.iter().copied())
            .collect()
    }

    /// The writes whose chunk is named in `rejected`, in their original order.
    ///
    /// A chunk scheduled more than once is kept once: every copy has the same
    /// content, so one resubmission covers them all.
    pub fn retain_rejected(self, rejected: &HashSet<ContentHash>) -> Self {
        let mut seen = HashSet::with_capacity(rejected.len());
        let writes = self
            .writes
            .into_iter()
            .filter(|w| {
                let hash = w.chunk.hash();
                rejected.contains(&hash) && seen.insert(hash)
            })
            .collect();
        Self { writes }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Vec<PendingWrite>,
    // Chunks drained by a flush that has not finished yet.
    in_flight: Vec<Chunk>,
}

#[derive(Debug, Default)]
pub struct PendingWriteQueue {
    state: Mutex<QueueState>,
}

impl PendingWriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a write. No deduplication: scheduling the same chunk twice
    /// queues it twice.
    pub fn schedule(&self, chunk: Chunk, height: u64, hints: Hints) {
        tracing::debug!(hash = %chunk.hash().short_hex(), height, hints = hints.len(), "scheduled");
        self.state.lock().pending.push(PendingWrite {
            chunk,
            height,
            hints,
        });
    }

    /// Atomically take everything scheduled so far, leaving the queue empty.
    ///
    /// The drained chunks stay visible to [`find`](Self::find) until
    /// [`settle`](Self::settle) is called.
    pub fn drain_snapshot(&self) -> Batch {
        let mut state = self.state.lock();
        let writes = std::mem::take(&mut state.pending);
        state
            .in_flight
            .extend(writes.iter().map(|w| w.chunk.clone()));
        Batch::new(writes)
    }

    /// Forget the chunks of a finished flush, successful or not.
    pub fn settle(&self) {
        self.state.lock().in_flight.clear();
    }

    /// A chunk with this hash that was scheduled and is either still queued
    /// or part of a flush in progress.
    pub fn find(&self, hash: &ContentHash) -> Option<Chunk> {
        let state = self.state.lock();
        state
            .pending
            .iter()
            .map(|w| &w.chunk)
            .chain(state.in_flight.iter())
            .find(|c| c.hash() == *hash)
            .cloned()
    }

    /// Writes scheduled and not yet drained.
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }
}
