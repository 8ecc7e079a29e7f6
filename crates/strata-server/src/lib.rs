//! Reference remote store service for Strata.
//!
//! Exposes a [`ChunkStore`](strata_store::ChunkStore) over HTTP with the
//! write-value, get-refs, chunk and root endpoints the client speaks. Partial
//! acceptance by the store becomes a 429 response naming the rejected chunks;
//! a stale compare-and-swap becomes a 409.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{AllowAllAuth, AuthProvider, TokenAuth};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::StrataServer;
