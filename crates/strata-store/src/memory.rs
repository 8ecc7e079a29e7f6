use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use strata_types::{Chunk, ContentHash};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ChunkStore, PutOutcome};

/// In-memory, HashMap-based chunk store.
///
/// Every chunk handed to `put_many` counts as one write, including chunks the
/// store already holds, so tests can observe exactly what reached the store.
pub struct InMemoryChunkStore {
    chunks: RwLock<HashMap<ContentHash, Chunk>>,
    root: Mutex<ContentHash>,
    writes: AtomicUsize,
}

impl InMemoryChunkStore {
    /// Create a new empty store with an empty root.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            root: Mutex::new(ContentHash::empty()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of distinct chunks currently stored.
    pub fn len(&self) -> usize {
        self.chunks.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total chunk writes performed since creation.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

impl ChunkStore for InMemoryChunkStore {
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>> {
        let map = self.chunks.read().map_err(poisoned)?;
        Ok(map.get(hash).cloned())
    }

    fn has(&self, hash: &ContentHash) -> StoreResult<bool> {
        let map = self.chunks.read().map_err(poisoned)?;
        Ok(map.contains_key(hash))
    }

    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome> {
        let mut map = self.chunks.write().map_err(poisoned)?;
        for chunk in chunks {
            map.entry(chunk.hash()).or_insert_with(|| chunk.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(PutOutcome::Accepted)
    }

    fn root(&self) -> StoreResult<ContentHash> {
        let root = self.root.lock().map_err(poisoned)?;
        Ok(*root)
    }

    fn compare_and_swap_root(
        &self,
        current: ContentHash,
        proposed: ContentHash,
    ) -> StoreResult<bool> {
        let mut root = self.root.lock().map_err(poisoned)?;
        if *root != current {
            tracing::debug!(
                expected = %current.short_hex(),
                actual = %root.short_hex(),
                "root compare-and-swap lost"
            );
            return Ok(false);
        }
        *root = proposed;
        Ok(true)
    }
}

impl std::fmt::Debug for InMemoryChunkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryChunkStore")
            .field("chunk_count", &self.chunks.read().map(|map| map.len()).ok())
            .field("writes", &self.writes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(data: &[u8]) -> Chunk {
        Chunk::new(data.to_vec())
    }

    // -----------------------------------------------------------------------
    // Chunks
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryChunkStore::new();
        let c = chunk(b"abc");
        assert!(store.put(&c).unwrap().is_accepted());
        assert_eq!(store.get(&c.hash()).unwrap(), Some(c.clone()));
        assert!(store.has(&c.hash()).unwrap());
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryChunkStore::new();
        let hash = ContentHash::of(b"missing");
        assert!(store.get(&hash).unwrap().is_none());
        assert!(!store.has(&hash).unwrap());
    }

    #[test]
    fn every_put_counts_as_a_write() {
        let store = InMemoryChunkStore::new();
        let c = chunk(b"abc");
        store.put_many(&[c.clone(), chunk(b"def")]).unwrap();
        store.put(&c).unwrap();
        assert_eq!(store.writes(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_many_preserves_positions() {
        let store = InMemoryChunkStore::new();
        let c = chunk(b"present");
        store.put(&c).unwrap();
        let results = store
            .get_many(&[ContentHash::of(b"absent"), c.hash()])
            .unwrap();
        assert!(results[0].is_none());
        assert_eq!(results[1].as_ref().map(Chunk::hash), Some(c.hash()));
    }

    #[test]
    fn poisoned_map_is_reported_not_hidden() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryChunkStore::new());
        store.put(&chunk(b"abc")).unwrap();
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.chunks.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(
            store.get(&ContentHash::of(b"abc")),
            Err(StoreError::Poisoned(_))
        ));
        let len = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.len()));
        assert!(len.is_err());
    }

    // -----------------------------------------------------------------------
    // Root
    // -----------------------------------------------------------------------

    #[test]
    fn root_starts_empty() {
        let store = InMemoryChunkStore::new();
        assert!(store.root().unwrap().is_empty());
    }

    #[test]
    fn cas_from_empty_sets_root() {
        let store = InMemoryChunkStore::new();
        let target = ContentHash::of(b"abc");
        assert!(store
            .compare_and_swap_root(ContentHash::empty(), target)
            .unwrap());
        assert_eq!(store.root().unwrap(), target);
    }

    #[test]
    fn cas_with_stale_current_is_rejected() {
        let store = InMemoryChunkStore::new();
        let first = ContentHash::of(b"first");
        let second = ContentHash::of(b"second");
        store
            .compare_and_swap_root(ContentHash::empty(), first)
            .unwrap();

        assert!(!store
            .compare_and_swap_root(ContentHash::empty(), second)
            .unwrap());
        assert_eq!(store.root().unwrap(), first);
    }

    #[test]
    fn concurrent_cas_has_one_winner() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryChunkStore::new());
        let handles: Vec<_> = (0u8..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .compare_and_swap_root(ContentHash::empty(), ContentHash::of(&[i]))
                        .unwrap()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(!store.root().unwrap().is_empty());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryChunkStore::new();
        store.put(&chunk(b"x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryChunkStore"));
        assert!(debug.contains("writes: 1"));
    }
}
