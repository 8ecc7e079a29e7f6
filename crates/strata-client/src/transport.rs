//! Request/response boundary between the client and the remote store service.
//!
//! A [`Transport`] performs exactly one exchange per call. Retrying, batching
//! and interpreting status codes all happen above it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strata_protocol::{Method, RequestFrame, ResponseFrame};

use crate::error::{ClientError, ClientResult};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame> {
        (**self).execute(request).await
    }
}

/// HTTP transport over `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: RequestFrame) -> ClientResult<ResponseFrame> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        tracing::debug!(method = %request.method, %url, bytes = request.body.len(), "sending request");

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if request.method == Method::Post {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(request.body);
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;
        Ok(ResponseFrame::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:9000/", None).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:9000");
    }
}
