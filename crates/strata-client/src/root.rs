use std::sync::Arc;

use strata_protocol::{endpoints, root_params, status, QueryParams, RequestFrame};
use strata_types::ContentHash;

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Reads and conditionally replaces the store's single root pointer.
///
/// There is no unconditional set: every change goes through
/// [`compare_and_swap_root`](Self::compare_and_swap_root).
pub struct RootClient {
    transport: Arc<dyn Transport>,
    params: QueryParams,
}

impl RootClient {
    pub fn new(transport: Arc<dyn Transport>, params: QueryParams) -> Self {
        Self { transport, params }
    }

    /// Current root, or the empty hash if none was ever set.
    pub async fn read_root(&self) -> ClientResult<ContentHash> {
        let request = RequestFrame::get(endpoints::ROOT, self.params.clone());
        let response = self.transport.execute(request).await?;
        if response.status != status::OK {
            return Err(ClientError::Remote {
                status: response.status,
                message: response.text(),
            });
        }
        let text = response.text();
        ContentHash::from_hex(text.trim())
            .map_err(|e| ClientError::MalformedResponse(format!("root `{}`: {e}", text.trim())))
    }

    /// Install `proposed` iff the service's root is still `current`.
    ///
    /// `Ok(false)` means another writer got there first; the root is
    /// unchanged and the caller decides whether to re-read and retry.
    pub async fn compare_and_swap_root(
        &self,
        current: ContentHash,
        proposed: ContentHash,
    ) -> ClientResult<bool> {
        let query = self
            .params
            .clone()
            .with(root_params::CURRENT, current.to_hex())
            .with(root_params::PROPOSED, proposed.to_hex());
        let request = RequestFrame::post(endpoints::ROOT, query, Vec::new());
        let response = self.transport.execute(request).await?;

        match response.status {
            status::OK => {
                tracing::info!(from = %current.short_hex(), to = %proposed.short_hex(), "root updated");
                Ok(true)
            }
            status::CONFLICT => {
                tracing::debug!(expected = %current.short_hex(), actual = %response.text(), "root moved");
                Ok(false)
            }
            other => Err(ClientError::Remote {
                status: other,
                message: response.text(),
            }),
        }
    }
}
