use thiserror::Error;

/// Errors surfaced by the client.
///
/// Backpressure is not in this list: a partial rejection is consumed by the
/// batch sender and only shows up here when resubmission stops making
/// progress. A lost root compare-and-swap is `Ok(false)`, not an error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] strata_protocol::ProtocolError),

    #[error("invalid chunk: {0}")]
    InvalidChunk(#[from] strata_types::TypeError),

    #[error("backpressure did not converge: resubmitted {submitted} chunks, {rejected} rejected again")]
    BackpressureStalled { submitted: usize, rejected: usize },

    #[error("backpressure retries exhausted after {rounds} rounds, {remaining} chunks unwritten")]
    RetriesExhausted { rounds: usize, remaining: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
