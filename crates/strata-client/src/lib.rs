//! Client write path for Strata.
//!
//! Chunks are scheduled into a local [`PendingWriteQueue`] and sent in
//! batches by a [`BatchSender`]. The service may accept only part of a batch;
//! the sender resubmits exactly the rejected chunks, in their original order,
//! until nothing is left. The store's single root pointer changes only through
//! compare-and-swap via [`RootClient`].
//!
//! [`BatchStore`] ties these together behind one handle:
//!
//! ```no_run
//! # async fn demo() -> strata_client::ClientResult<()> {
//! use strata_client::{BatchStore, ClientConfig};
//! use strata_types::{Chunk, Hints};
//!
//! let config = ClientConfig::from_url("http://localhost:9000?access_token=secret")?;
//! let store = BatchStore::connect(&config)?;
//! let chunk = Chunk::new(b"hello".to_vec());
//! store.schedule_put(chunk.clone(), 1, Hints::new());
//! let current = store.root().await?;
//! if !store.update_root(current, chunk.hash()).await? {
//!     // Someone else moved the root; re-read and try again.
//! }
//! store.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod batch_store;
pub mod config;
pub mod error;
pub mod queue;
pub mod reader;
pub mod root;
pub mod sender;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use batch_store::BatchStore;
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ClientError, ClientResult};
pub use queue::{Batch, PendingWrite, PendingWriteQueue};
pub use reader::ChunkReader;
pub use root::RootClient;
pub use sender::{BatchSender, FlushReport};
pub use transport::{HttpTransport, Transport};
