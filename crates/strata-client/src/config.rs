use serde::{Deserialize, Serialize};
use strata_protocol::QueryParams;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Bounds on the backpressure retry loop.
///
/// The sender always aborts a flush whose rejection set stops shrinking, which
/// alone limits a batch of `n` writes to `n` rounds. `max_rounds` adds a
/// tighter cap when one is wanted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_rounds: Option<usize>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self { max_rounds: None }
    }

    pub fn max_rounds(rounds: usize) -> Self {
        Self {
            max_rounds: Some(rounds),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service base URL without a query string, e.g. `http://localhost:9000`.
    pub base_url: String,
    /// Forwarded verbatim on every request.
    pub params: QueryParams,
    pub retry: RetryPolicy,
    /// Per-request timeout for the HTTP transport. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".into(),
            params: QueryParams::new(),
            retry: RetryPolicy::default(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Split a store URL into its base and the parameters to forward.
    ///
    /// `http://localhost:9000?access_token=t&other=19` yields base
    /// `http://localhost:9000` and both parameters.
    pub fn from_url(url: &str) -> ClientResult<Self> {
        let mut parsed = Url::parse(url).map_err(|e| ClientError::Config(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }
        let params = QueryParams::from_url(&parsed);
        parsed.set_query(None);
        parsed.set_fragment(None);
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            params,
            ..Self::default()
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.params = self.params.with_access_token(token);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
