//! Server Module
//!
//! TCP listener, per-connection handler and command dispatch for the wire
//! protocol.

mod connection;
mod dispatch;
mod listener;

pub use connection::{Connection, ConnectionSettings};
pub use dispatch::dispatch;
pub use listener::Listener;
