//! Wire Codec Module
//!
//! Encodes commands into the array/bulk-string request format and scans raw
//! buffers back into tokens.
//!
//! ```text
//! *3\r\n            Array(3)
//! $3\r\nSET\r\n     BulkLength(3), Payload("SET")
//! $3\r\nkey\r\n     BulkLength(3), Payload("key")
//! $5\r\nvalue\r\n   BulkLength(5), Payload("value")
//! ```

use serde::Serialize;

use crate::error::{Result, ServerError};

/// Line terminator used by every element of the format.
pub const CRLF: &[u8] = b"\r\n";

/// Leading marker bytes.
pub mod marker {
    pub const ARRAY: u8 = b'*';
    pub const BULK_STRING: u8 = b'$';
    pub const SIMPLE_STRING: u8 = b'+';
    pub const INTEGER: u8 = b':';
    pub const ERROR: u8 = b'-';
}

// == Token ==
/// One element of a decoded buffer, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// `*N`: an array of N elements follows
    Array(usize),
    /// `$L`: a bulk string of L bytes follows
    BulkLength(usize),
    /// The bytes of a bulk string
    Payload(String),
}

// == Serialize ==
/// Encodes a command and its arguments as an array of bulk strings.
///
/// The array length is one for the command plus one per argument, and each
/// bulk string header carries the payload's byte length.
pub fn serialize<S: AsRef<str>>(command: &str, args: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    write_header(&mut out, marker::ARRAY, args.len() + 1);
    write_bulk(&mut out, command);
    for arg in args {
        write_bulk(&mut out, arg.as_ref());
    }
    out
}

pub(crate) fn write_header(out: &mut Vec<u8>, marker: u8, n: usize) {
    out.push(marker);
    out.extend_from_slice(n.to_string().as_bytes());
    out.extend_from_slice(CRLF);
}

pub(crate) fn write_bulk(out: &mut Vec<u8>, payload: &str) {
    write_header(out, marker::BULK_STRING, payload.len());
    out.extend_from_slice(payload.as_bytes());
    out.extend_from_slice(CRLF);
}

// == Decode ==
/// Scans a buffer into its token stream.
///
/// Only array and bulk-string markers are accepted; any other leading byte
/// is an invalid token. The scanner does not check that array counts match
/// the elements that follow; see [`parse_request`] for that.
pub fn decode(buf: &[u8]) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new(buf);
    let mut tokens = Vec::new();

    while let Some(byte) = scanner.next_byte() {
        match byte {
            marker::ARRAY => {
                let count = scanner.read_length()?;
                tokens.push(Token::Array(count));
            }
            marker::BULK_STRING => {
                let len = scanner.read_length()?;
                tokens.push(Token::BulkLength(len));
                let payload = scanner.read_payload(len)?;
                tokens.push(Token::Payload(payload));
            }
            other => {
                return Err(ServerError::protocol(format!(
                    "invalid token {:?} at byte {}",
                    other as char,
                    scanner.pos - 1
                )));
            }
        }
    }

    Ok(tokens)
}

// == Parse Request ==
/// Decodes exactly one request: an array of N bulk strings.
///
/// Returns the bulk-string payloads in order. Unframed input, a count that
/// does not match the elements present, and bytes after the array are all
/// protocol errors.
pub fn parse_request(buf: &[u8]) -> Result<Vec<String>> {
    let mut tokens = decode(buf)?.into_iter();

    let count = match tokens.next() {
        Some(Token::Array(count)) => count,
        Some(_) => return Err(ServerError::protocol("expected '*' array header")),
        None => return Err(ServerError::protocol("empty request")),
    };

    let mut args = Vec::new();
    for _ in 0..count {
        match (tokens.next(), tokens.next()) {
            (Some(Token::BulkLength(_)), Some(Token::Payload(payload))) => args.push(payload),
            _ => {
                return Err(ServerError::protocol(format!(
                    "expected {} bulk strings, found {}",
                    count,
                    args.len()
                )))
            }
        }
    }

    if tokens.next().is_some() {
        return Err(ServerError::protocol("unexpected data after request"));
    }

    Ok(args)
}

/// Forward-only cursor over a byte buffer.
struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads a non-negative decimal up to and including the next CRLF.
    fn read_length(&mut self) -> Result<usize> {
        let rest = &self.buf[self.pos..];
        let end = rest
            .windows(CRLF.len())
            .position(|w| w == CRLF)
            .ok_or_else(|| ServerError::protocol("missing CRLF after length"))?;

        let digits = std::str::from_utf8(&rest[..end])
            .map_err(|_| ServerError::protocol("length is not valid UTF-8"))?;
        let n = digits
            .parse::<usize>()
            .map_err(|_| ServerError::protocol(format!("invalid length {:?}", digits)))?;

        self.pos += end + CRLF.len();
        Ok(n)
    }

    /// Reads exactly `len` payload bytes followed by CRLF.
    fn read_payload(&mut self, len: usize) -> Result<String> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| ServerError::protocol("bulk string shorter than its length"))?;

        let payload = std::str::from_utf8(&self.buf[self.pos..end])
            .map_err(|_| ServerError::protocol("bulk string is not valid UTF-8"))?
            .to_string();

        if self.buf.get(end..end + CRLF.len()) != Some(CRLF) {
            return Err(ServerError::protocol("missing CRLF after bulk string"));
        }

        self.pos = end + CRLF.len();
        Ok(payload)
    }
}
