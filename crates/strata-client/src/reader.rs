use std::collections::HashMap;
use std::sync::Arc;

use strata_protocol::{
    endpoints, status, GetRefsRequest, GetRefsResponse, QueryParams, RequestFrame, WireCodec,
};
use strata_types::{Chunk, ContentHash};

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Point reads against the remote store, independent of batching.
pub struct ChunkReader {
    transport: Arc<dyn Transport>,
    params: QueryParams,
}

impl ChunkReader {
    pub fn new(transport: Arc<dyn Transport>, params: QueryParams) -> Self {
        Self { transport, params }
    }

    /// Fetch one chunk. `Ok(None)` if the service does not have it.
    ///
    /// The payload is rehashed; a mismatch is [`ClientError::InvalidChunk`].
    pub async fn get(&self, hash: &ContentHash) -> ClientResult<Option<Chunk>> {
        let request = RequestFrame::get(endpoints::chunk_path(hash), self.params.clone());
        let response = self.transport.execute(request).await?;
        match response.status {
            status::OK => Ok(Some(Chunk::verified(*hash, response.body.to_vec())?)),
            status::NOT_FOUND => Ok(None),
            other => Err(ClientError::Remote {
                status: other,
                message: response.text(),
            }),
        }
    }

    /// Fetch several chunks in one request.
    ///
    /// Returns the chunks the service has, in request order; absent ones are
    /// skipped. A hash requested twice yields the chunk twice.
    pub async fn get_many(&self, hashes: &[ContentHash]) -> ClientResult<Vec<Chunk>> {
        if hashes.is_empty() {
            return Ok(Vec::new());
        }
        let body = WireCodec::encode(&GetRefsRequest {
            hashes: hashes.to_vec(),
        })?;
        let request = RequestFrame::post(endpoints::GET_REFS, self.params.clone(), body);
        let response = self.transport.execute(request).await?;
        if response.status != status::OK {
            return Err(ClientError::Remote {
                status: response.status,
                message: response.text(),
            });
        }

        let resp: GetRefsResponse = WireCodec::decode(&response.body)?;
        let mut found: HashMap<ContentHash, Chunk> = HashMap::with_capacity(resp.chunks.len());
        for chunk in resp.chunks {
            if !hashes.contains(&chunk.hash()) {
                return Err(ClientError::MalformedResponse(format!(
                    "service returned unrequested chunk {}",
                    chunk.hash()
                )));
            }
            found.insert(chunk.hash(), chunk);
        }
        Ok(hashes.iter().filter_map(|h| found.get(h).cloned()).collect())
    }
}
