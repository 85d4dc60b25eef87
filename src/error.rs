//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Server Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Peer closed the socket before sending a request
    #[error("Client disconnected")]
    Disconnected,

    /// Malformed frame or bad command arguments
    #[error("{0}")]
    Protocol(String),

    /// A read or write deadline elapsed
    #[error("Timed out during {0}")]
    Timeout(&'static str),

    /// Socket level failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid HTTP request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServerError {
    /// Shorthand for building a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        ServerError::Protocol(msg.into())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Protocol(_) | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ServerError::Disconnected | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, ServerError>;
