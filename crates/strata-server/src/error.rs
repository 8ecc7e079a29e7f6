use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("chunk not found: {0}")]
    NotFound(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] strata_protocol::ProtocolError),

    #[error("invalid hash: {0}")]
    InvalidHash(#[from] strata_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] strata_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Protocol(_) | Self::InvalidHash(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(strata_store::StoreError::MissingHint(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
