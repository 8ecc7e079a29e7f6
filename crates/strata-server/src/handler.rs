//! Request handlers for the remote store service.
//!
//! Every handler authorizes the raw query string before touching the store.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use serde_json::json;
use strata_protocol::{
    root_params, BackpressureResponse, GetRefsRequest, GetRefsResponse, QueryParams, ServiceInfo,
    WireCodec, WriteValueRequest,
};
use strata_store::{PutOutcome, StoreError};
use strata_types::ContentHash;

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

fn authorize(state: &AppState, query: Option<String>) -> ServerResult<QueryParams> {
    let params = query.as_deref().map(QueryParams::parse).unwrap_or_default();
    state.auth.authorize(&params)?;
    Ok(params)
}

fn binary(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/octet-stream")],
        body,
    )
        .into_response()
}

/// POST write-value: persist a batch, answering 429 with whatever the store
/// did not accept.
pub async fn write_value(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ServerResult<Response> {
    authorize(&state, query)?;
    let request: WriteValueRequest = WireCodec::decode(&body)?;

    for hint in &request.hints {
        if !state.store.has(hint)? {
            return Err(StoreError::MissingHint(*hint).into());
        }
    }

    match state.store.put_many(&request.chunks)? {
        PutOutcome::Accepted => {
            tracing::debug!(chunks = request.chunks.len(), "write accepted");
            Ok(StatusCode::CREATED.into_response())
        }
        PutOutcome::Backpressure(rejected) => {
            tracing::debug!(
                chunks = request.chunks.len(),
                rejected = rejected.len(),
                "write partially accepted"
            );
            let body = WireCodec::encode(&BackpressureResponse { rejected })?;
            Ok(binary(StatusCode::TOO_MANY_REQUESTS, body))
        }
    }
}

/// POST get-refs: return the requested chunks the store holds, in request order.
pub async fn get_refs(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ServerResult<Response> {
    authorize(&state, query)?;
    let request: GetRefsRequest = WireCodec::decode(&body)?;
    let chunks = state
        .store
        .get_many(&request.hashes)?
        .into_iter()
        .flatten()
        .collect();
    let body = WireCodec::encode(&GetRefsResponse { chunks })?;
    Ok(binary(StatusCode::OK, body))
}

/// GET a single chunk's raw payload.
pub async fn get_chunk(
    State(state): State<AppState>,
    Path(hash): Path<String>,
    RawQuery(query): RawQuery,
) -> ServerResult<Response> {
    authorize(&state, query)?;
    let hash = ContentHash::from_hex(&hash)?;
    let chunk = state
        .store
        .get(&hash)?
        .ok_or_else(|| ServerError::NotFound(hash.to_hex()))?;
    Ok(binary(StatusCode::OK, chunk.into_payload()))
}

/// GET the root as hex text.
pub async fn root_get(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ServerResult<String> {
    authorize(&state, query)?;
    Ok(state.store.root()?.to_hex())
}

/// POST root: compare-and-swap. 200 when swapped, 409 when `current` is stale.
pub async fn root_post(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ServerResult<Response> {
    let params = authorize(&state, query)?;
    let current = required_hash(&params, root_params::CURRENT)?;
    let proposed = required_hash(&params, root_params::PROPOSED)?;

    if state.store.compare_and_swap_root(current, proposed)? {
        tracing::info!(
            from = %current.short_hex(),
            to = %proposed.short_hex(),
            "root updated"
        );
        Ok((StatusCode::OK, proposed.to_hex()).into_response())
    } else {
        let actual = state.store.root()?;
        Ok((StatusCode::CONFLICT, actual.to_hex()).into_response())
    }
}

fn required_hash(params: &QueryParams, key: &str) -> ServerResult<ContentHash> {
    let value = params
        .get(key)
        .ok_or_else(|| ServerError::BadRequest(format!("missing query parameter `{key}`")))?;
    Ok(ContentHash::from_hex(value)?)
}

pub async fn info_handler() -> Json<serde_json::Value> {
    let info = ServiceInfo::default();
    Json(json!({
        "name": "strata-server",
        "status": info.status,
        "version": info.version,
        "protocol_version": info.protocol_version,
    }))
}
