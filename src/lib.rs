//! respcache - A single-node in-memory cache over a RESP-style wire protocol
//!
//! Provides PING, ECHO, SET (with EX/PX/EXAT/PXAT expiry), GET and EXISTS
//! over TCP, backed by an LRU cache with lazy TTL expiration. An optional
//! HTTP facade exposes the wire codec.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod server;

pub use api::AppState;
pub use config::Config;
pub use server::Listener;
