//! Fakes shared by the client tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use parking_lot::Mutex;
use strata_protocol::{endpoints, RequestFrame, ResponseFrame};
use strata_store::{ChunkStore, InMemoryChunkStore, PutOutcome, StoreResult};
use strata_types::{Chunk, ContentHash};
use tokio::sync::Notify;
use tower::util::ServiceExt;

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Dispatches frames straight into a service router, no sockets involved.
pub struct InProcessTransport {
    router: Router,
    requests: Mutex<Vec<RequestFrame>>,
}

impl InProcessTransport {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestFrame> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for InProcessTransport {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame> {
        self.requests.lock().push(request.clone());
        let http = Request::builder()
            .method(request.method.as_str())
            .uri(request.path_and_query())
            .body(Body::from(request.body))
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let response = match self.router.clone().oneshot(http).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status().as_u16();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ResponseFrame::new(status, body))
    }
}

/// Holds every write-value request until released, passing other requests
/// straight through.
pub struct GatedTransport<T> {
    inner: T,
    /// Signalled when a write-value request arrives.
    pub started: Notify,
    /// Lets one held write-value request continue.
    pub release: Notify,
}

impl<T> GatedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for GatedTransport<T> {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame> {
        if request.path == endpoints::WRITE_VALUE {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.execute(request).await
    }
}

/// Replays canned responses in order and records what was asked.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ClientResult<ResponseFrame>>>,
    requests: Mutex<Vec<RequestFrame>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<ClientResult<ResponseFrame>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestFrame> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())))
    }
}

type RejectFn = dyn Fn(usize, usize) -> Vec<usize> + Send + Sync;

/// Store whose `put_many` rejects the batch positions chosen by a script.
///
/// The script receives the zero-based call number and the batch length.
/// Accepted chunks land in an inner in-memory store.
pub struct ScriptedStore {
    inner: InMemoryChunkStore,
    reject: Box<RejectFn>,
    calls: Mutex<Vec<Vec<ContentHash>>>,
}

impl ScriptedStore {
    pub fn new(reject: impl Fn(usize, usize) -> Vec<usize> + Send + Sync + 'static) -> Self {
        Self {
            inner: InMemoryChunkStore::new(),
            reject: Box::new(reject),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &InMemoryChunkStore {
        &self.inner
    }

    /// Hashes submitted on each `put_many` call.
    pub fn calls(&self) -> Vec<Vec<ContentHash>> {
        self.calls.lock().clone()
    }
}

/// Accepts `n` chunks on its `n`-th call, rejecting the rest.
pub fn backpressure_fixture() -> ScriptedStore {
    ScriptedStore::new(|call, len| ((call + 1).min(len)..len).collect())
}

impl ChunkStore for ScriptedStore {
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>> {
        self.inner.get(hash)
    }

    fn has(&self, hash: &ContentHash) -> StoreResult<bool> {
        self.inner.has(hash)
    }

    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome> {
        let call = {
            let mut calls = self.calls.lock();
            calls.push(chunks.iter().map(Chunk::hash).collect());
            calls.len() - 1
        };
        let rejected = (self.reject)(call, chunks.len());
        let accepted: Vec<Chunk> = chunks
            .iter()
            .enumerate()
            .filter(|(i, _)| !rejected.contains(i))
            .map(|(_, c)| c.clone())
            .collect();
        self.inner.put_many(&accepted)?;
        if rejected.is_empty() {
            Ok(PutOutcome::Accepted)
        } else {
            Ok(PutOutcome::Backpressure(
                rejected.iter().map(|&i| chunks[i].hash()).collect(),
            ))
        }
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

/// In-memory store that remembers the order chunks were accepted in.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryChunkStore,
    accepted: Mutex<Vec<ContentHash>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryChunkStore {
        &self.inner
    }

    pub fn accepted(&self) -> Vec<ContentHash> {
        self.accepted.lock().clone()
    }
}

impl ChunkStore for RecordingStore {
    fn get(&self, hash: &ContentHash) -> StoreResult<Option<Chunk>> {
        self.inner.get(hash)
    }

    fn has(&self, hash: &ContentHash) -> StoreResult<bool> {
        self.inner.has(hash)
    }

    fn put_many(&self, chunks: &[Chunk]) -> StoreResult<PutOutcome> {
        self.accepted.lock().extend(chunks.iter().map(Chunk::hash));
        self.inner.put_many(chunks)
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
