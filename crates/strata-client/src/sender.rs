//! Batch sender: flushes the pending-write queue and drives the
//! backpressure retry loop.

use std::collections::HashSet;
use std::sync::Arc;

use strata_protocol::{
    endpoints, status, BackpressureResponse, QueryParams, RequestFrame, WireCodec,
    WriteValueRequest,
};
use strata_types::ContentHash;
use tokio::sync::Mutex;

use crate::config::RetryPolicy;
use crate::error::{ClientError, ClientResult};
use crate::queue::{Batch, PendingWriteQueue};
use crate::transport::Transport;

/// Summary of a successful flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Write-value requests issued.
    pub rounds: usize,
    /// Chunks transmitted across all rounds, resubmissions included.
    pub chunks_sent: usize,
    /// Writes in the drained snapshot, all durable once the flush returns.
    pub chunks_accepted: usize,
}

struct SettleOnDrop<'a>(&'a PendingWriteQueue);

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.settle();
    }
}

pub struct BatchSender {
    transport: Arc<dyn Transport>,
    params: QueryParams,
    retry: RetryPolicy,
    // Held for a whole flush, snapshot included, so rounds of two flushes
    // never interleave and earlier snapshots finish first.
    flush_lock: Mutex<()>,
}

impl BatchSender {
    pub fn new(transport: Arc<dyn Transport>, params: QueryParams, retry: RetryPolicy) -> Self {
        Self {
            transport,
            params,
            retry,
            flush_lock: Mutex::new(()),
        }
    }

    /// Drain `queue` and send the snapshot until every write is accepted.
    ///
    /// An empty queue completes immediately without contacting the service.
    ///
    /// Drained chunks stay readable through [`PendingWriteQueue::find`] until
    /// the flush returns or is dropped.
    pub async fn flush(&self, queue: &PendingWriteQueue) -> ClientResult<FlushReport> {
        let _guard = self.flush_lock.lock().await;
        let batch = queue.drain_snapshot();
        let _settle = SettleOnDrop(queue);
        if batch.is_empty() {
            return Ok(FlushReport::default());
        }
        self.send_batch(batch).await
    }

    /// Send `batch`, resubmitting exactly the rejected writes, in their
    /// original order, until a round comes back with no rejections.
    ///
    /// A rejection set that does not shrink aborts with
    /// [`ClientError::BackpressureStalled`]; one naming a hash that was not
    /// submitted in that round aborts with [`ClientError::MalformedResponse`].
    pub async fn send_batch(&self, batch: Batch) -> ClientResult<FlushReport> {
        let max_rounds = self.retry.max_rounds.map(|n| n.max(1));
        let mut report = FlushReport {
            chunks_accepted: batch.len(),
            ..FlushReport::default()
        };
        let mut pending = batch;

        loop {
            if max_rounds.is_some_and(|max| report.rounds >= max) {
                tracing::warn!(
                    rounds = report.rounds,
                    remaining = pending.len(),
                    "giving up on backpressure"
                );
                return Err(ClientError::RetriesExhausted {
                    rounds: report.rounds,
                    remaining: pending.len(),
                });
            }

            report.rounds += 1;
            report.chunks_sent += pending.len();
            let rejected = self.write_round(&pending).await?;
            if rejected.is_empty() {
                tracing::info!(
                    rounds = report.rounds,
                    sent = report.chunks_sent,
                    accepted = report.chunks_accepted,
                    "flush complete"
                );
                return Ok(report);
            }

            let submitted: HashSet<ContentHash> = pending.hashes().collect();
            if let Some(unknown) = rejected.iter().find(|h| !submitted.contains(*h)) {
                return Err(ClientError::MalformedResponse(format!(
                    "service rejected chunk {unknown} that was not submitted"
                )));
            }

            let submitted_len = pending.len();
            let rejected: HashSet<ContentHash> = rejected.into_iter().collect();
            let next = pending.retain_rejected(&rejected);
            if next.len() >= submitted_len {
                tracing::warn!(
                    round = report.rounds,
                    submitted = submitted_len,
                    rejected = next.len(),
                    "backpressure is not converging"
                );
                return Err(ClientError::BackpressureStalled {
                    submitted: submitted_len,
                    rejected: next.len(),
                });
            }

            tracing::debug!(
                round = report.rounds,
                submitted = submitted_len,
                rejected = next.len(),
                "backpressure, resubmitting rejected chunks"
            );
            pending = next;
        }
    }

    /// One write-value request. Returns the hashes the service rejected.
    async fn write_round(&self, batch: &Batch) -> ClientResult<Vec<ContentHash>> {
        let body = WireCodec::encode(&WriteValueRequest {
            chunks: batch.chunks(),
            hints: batch.hints(),
        })?;
        let request = RequestFrame::post(endpoints::WRITE_VALUE, self.params.clone(), body);
        let response = self.transport.execute(request).await?;

        match response.status {
            status::OK | status::CREATED => Ok(Vec::new()),
            status::TOO_MANY_REQUESTS => {
                let bpe: BackpressureResponse = WireCodec::decode(&response.body).map_err(|e| {
                    ClientError::MalformedResponse(format!("undecodable backpressure body: {e}"))
                })?;
                if bpe.rejected.is_empty() {
                    return Err(ClientError::MalformedResponse(
                        "backpressure response names no chunks".into(),
                    ));
                }
                Ok(bpe.rejected)
            }
            other => Err(ClientError::Remote {
                status: other,
                message: response.text(),
            }),
        }
    }
}
