use strata_protocol::QueryParams;

use crate::error::{ServerError, ServerResult};

/// Decides whether a request's query parameters grant access.
pub trait AuthProvider: Send + Sync {
    fn authorize(&self, params: &QueryParams) -> ServerResult<()>;
}

pub struct AllowAllAuth;

impl AuthProvider for AllowAllAuth {
    fn authorize(&self, _params: &QueryParams) -> ServerResult<()> {
        Ok(())
    }
}

/// Requires `access_token` to equal a configured value.
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AuthProvider for TokenAuth {
    fn authorize(&self, params: &QueryParams) -> ServerResult<()> {
        match params.access_token() {
            Some(token) if token == self.token => Ok(()),
            Some(_) => Err(ServerError::Unauthorized("invalid access token".into())),
            None => Err(ServerError::Unauthorized("missing access token".into())),
        }
    }
}
