use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use strata_protocol::{endpoints, MAX_MESSAGE_SIZE};
use strata_store::ChunkStore;
use tower_http::trace::TraceLayer;

use crate::auth::AuthProvider;
use crate::handler;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChunkStore>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn ChunkStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }
}

/// Build the axum router with all service endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::WRITE_VALUE, post(handler::write_value))
        .route(endpoints::GET_REFS, post(handler::get_refs))
        .route(
            endpoints::ROOT,
            get(handler::root_get).post(handler::root_post),
        )
        .route("/ref/:hash", get(handler::get_chunk))
        .route(endpoints::INFO, get(handler::info_handler))
        .layer(DefaultBodyLimit::max(MAX_MESSAGE_SIZE + 1))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
