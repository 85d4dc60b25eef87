//! API Handlers
//!
//! HTTP request handlers for the codec facade and cache diagnostics.

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::cache::SharedCache;
use crate::error::{Result, ServerError};
use crate::models::{DeserializeResponse, HealthResponse, SerialiseRequest, StatsResponse};
use crate::protocol::{decode, serialize};

/// Application state shared across all handlers.
///
/// Holds the same cache handle the wire-protocol listener uses.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState around an existing shared cache.
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }
}

/// Handler for POST /resp/serialise
///
/// Encodes a command and its arguments and returns the raw wire bytes.
pub async fn serialise_handler(Json(req): Json<SerialiseRequest>) -> Result<impl IntoResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(ServerError::InvalidRequest(error_msg));
    }

    let bytes = serialize(&req.command, &req.args);

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

/// Handler for POST /resp/deserialize
///
/// Scans a raw request body into its token stream.
pub async fn deserialize_handler(body: Bytes) -> Result<Json<DeserializeResponse>> {
    let tokens = decode(&body)?;
    Ok(Json(DeserializeResponse::new(tokens)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    // Acquire read lock for stats
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
