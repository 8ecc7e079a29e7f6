use std::sync::Arc;

use strata_store::{ChunkStore, InMemoryChunkStore, ThrottledStore};
use tokio::net::TcpListener;

use crate::auth::{AllowAllAuth, AuthProvider, TokenAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Remote store service over a single chunk store.
pub struct StrataServer {
    config: ServerConfig,
    state: AppState,
}

impl StrataServer {
    /// Serve a fresh in-memory store, throttled if the config says so.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryChunkStore::new()))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn ChunkStore>) -> Self {
        let store: Arc<dyn ChunkStore> = match config.max_chunks_per_write {
            Some(limit) => Arc::new(ThrottledStore::new(store, limit)),
            None => store,
        };
        let auth: Arc<dyn AuthProvider> = match &config.access_token {
            Some(token) => Arc::new(TokenAuth::new(token.clone())),
            None => Arc::new(AllowAllAuth),
        };
        Self {
            config,
            state: AppState::new(store, auth),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ChunkStore> {
        &self.state.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("strata server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
