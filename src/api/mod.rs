//! API Module
//!
//! HTTP facade over the wire codec, plus cache diagnostics.
//!
//! # Endpoints
//! - `POST /resp/serialise` - Encode a command to wire bytes
//! - `POST /resp/deserialize` - Decode wire bytes to tokens
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
