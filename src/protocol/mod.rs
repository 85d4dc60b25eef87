//! Protocol Module
//!
//! RESP-style wire format: request codec, typed commands and replies.

pub mod codec;
pub mod command;
pub mod reply;

pub use codec::{decode, parse_request, serialize, Token};
pub use command::{Command, Expiry};
pub use reply::Reply;
