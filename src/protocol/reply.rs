//! Reply types and their wire encoding.

use crate::protocol::codec::{marker, write_bulk, write_header, CRLF};

/// Payload of the nil reply. The nil reply is a one-element array holding
/// this bulk string rather than the standard `$-1`.
pub const NIL_PAYLOAD: &str = "(nil)";

// == Reply ==
/// Everything the server can send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+<text>`
    Simple(String),
    /// `-<text>`
    Error(String),
    /// `:<n>`
    Integer(i64),
    /// `$<len>` and payload
    Bulk(String),
    /// `*<n>` followed by n bulk strings
    Array(Vec<String>),
    /// `*1\r\n$5\r\n(nil)\r\n`
    Nil,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Simple("OK".to_string())
    }

    /// `PONG` wrapped in a one-element array.
    pub fn pong() -> Self {
        Reply::Array(vec!["PONG".to_string()])
    }

    /// Generic error, prefixed with `ERR`.
    pub fn error(msg: impl std::fmt::Display) -> Self {
        Reply::Error(format!("ERR {}", msg))
    }

    /// Encodes the reply for the socket.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Reply::Simple(text) => write_line(out, marker::SIMPLE_STRING, text),
            Reply::Error(text) => write_line(out, marker::ERROR, text),
            Reply::Integer(n) => write_line(out, marker::INTEGER, &n.to_string()),
            Reply::Bulk(payload) => write_bulk(out, payload),
            Reply::Array(items) => {
                write_header(out, marker::ARRAY, items.len());
                for item in items {
                    write_bulk(out, item);
                }
            }
            Reply::Nil => {
                write_header(out, marker::ARRAY, 1);
                write_bulk(out, NIL_PAYLOAD);
            }
        }
    }
}

fn write_line(out: &mut Vec<u8>, marker: u8, text: &str) {
    out.push(marker);
    // Line-based replies cannot carry a terminator
    out.extend(text.bytes().filter(|b| *b != b'\r' && *b != b'\n'));
    out.extend_from_slice(CRLF);
}
