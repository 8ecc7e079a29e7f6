use std::sync::Arc;
use std::time::Duration;

use strata_types::{Chunk, ContentHash, Hints};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::queue::PendingWriteQueue;
use crate::reader::ChunkReader;
use crate::root::RootClient;
use crate::sender::{BatchSender, FlushReport};
use crate::transport::{HttpTransport, Transport};

/// Client handle on a remote chunk store.
///
/// Writes are buffered locally until [`flush`](Self::flush); reads and root
/// operations go straight to the service. Share it between producer tasks
/// behind an `Arc`.
pub struct BatchStore {
    queue: PendingWriteQueue,
    sender: BatchSender,
    roots: RootClient,
    reader: ChunkReader,
}

impl BatchStore {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            queue: PendingWriteQueue::new(),
            sender: BatchSender::new(
                Arc::clone(&transport),
                config.params.clone(),
                config.retry.clone(),
            ),
            roots: RootClient::new(Arc::clone(&transport), config.params.clone()),
            reader: ChunkReader::new(transport, config.params.clone()),
        }
    }

    /// Talk to `config.base_url` over HTTP.
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let timeout = config.timeout_secs.map(Duration::from_secs);
        let transport = HttpTransport::new(config.base_url.clone(), timeout)?;
        tracing::debug!(base_url = %config.base_url, "connecting batch store");
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Buffer `chunk` for the next flush.
    ///
    /// `hints` name chunks already durable at the service that this one
    /// references; they are checked there instead of being resent.
    pub fn schedule_put(&self, chunk: Chunk, height: u64, hints: Hints) {
        self.queue.schedule(chunk, height, hints);
    }

    /// Send everything scheduled so far and wait until it is durable.
    pub async fn flush(&self) -> ClientResult<FlushReport> {
        self.sender.flush(&self.queue).await
    }

    /// Read a chunk, answering from the pending queue when it has not been
    /// flushed yet.
    pub async fn get(&self, hash: &ContentHash) -> ClientResult<Option<Chunk>> {
        if let Some(chunk) = self.queue.find(hash) {
            return Ok(Some(chunk));
        }
        self.reader.get(hash).await
    }

    pub async fn get_many(&self, hashes: &[ContentHash]) -> ClientResult<Vec<Chunk>> {
        self.reader.get_many(hashes).await
    }

    pub async fn root(&self) -> ClientResult<ContentHash> {
        self.roots.read_root().await
    }

    /// Flush, then compare-and-swap the root from `current` to `proposed`.
    ///
    /// A failed flush is returned as is and the root is not touched.
    pub async fn update_root(
        &self,
        current: ContentHash,
        proposed: ContentHash,
    ) -> ClientResult<bool> {
        self.flush().await?;
        self.roots.compare_and_swap_root(current, proposed).await
    }

    /// Writes scheduled and not yet drained by a flush.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Flush and release the store.
    pub async fn close(self) -> ClientResult<FlushReport> {
        self.flush().await
    }
}

impl Drop for BatchStore {
    fn drop(&mut self) {
        let pending = self.queue.len();
        if pending > 0 {
            tracing::warn!(pending, "batch store dropped with unflushed writes");
        }
    }
}
