//! Chunk storage for Strata.
//!
//! This crate defines the interface a remote store service persists chunks
//! through, plus the backends the reference service and tests run on. Chunks
//! are immutable and keyed by [`ContentHash`](strata_types::ContentHash); the
//! single mutable value per store is its root, which only changes through
//! compare-and-swap.
//!
//! # Storage Backends
//!
//! All backends implement the [`ChunkStore`] trait:
//!
//! - [`InMemoryChunkStore`] -- `HashMap`-based store that counts every write
//! - [`ThrottledStore`] -- wraps another store and accepts at most a fixed
//!   number of chunks per `put_many`, reporting the rest as backpressure
//!
//! # Design Rules
//!
//! 1. Chunks are immutable once written; rewriting one is a no-op for content.
//! 2. `put_many` may persist only part of its input, but must name every
//!    chunk it did not persist.
//! 3. The root is never overwritten blindly.

pub mod error;
pub mod memory;
pub mod throttled;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryChunkStore;
pub use throttled::ThrottledStore;
pub use traits::{ChunkStore, PutOutcome};
