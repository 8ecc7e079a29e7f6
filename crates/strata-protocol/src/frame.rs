use bytes::Bytes;

use crate::params::QueryParams;

/// HTTP status codes the protocol assigns meaning to.
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const TOO_MANY_REQUESTS: u16 = 429;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound request, independent of how it is carried.
#[derive(Clone, Debug)]
pub struct RequestFrame {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: Bytes,
}

impl RequestFrame {
    pub fn get(path: impl Into<String>, query: QueryParams) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query,
            body: Bytes::new(),
        }
    }

    pub fn post(path: impl Into<String>, query: QueryParams, body: impl Into<Bytes>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query,
            body: body.into(),
        }
    }

    /// Path plus encoded query string, e.g. `/root/?access_token=x`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_query_string())
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResponseFrame {
    pub status: u16,
    pub body: Bytes,
}

impl ResponseFrame {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text for error messages, lossy on invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
