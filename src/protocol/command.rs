//! Command Parser
//!
//! Turns the positional arguments of one request into a typed command.
//! Argument counts are checked here so that dispatch never indexes past the
//! end of a request.

use crate::cache::ExpiryKind;
use crate::error::{Result, ServerError};

/// Expiry requested by `SET ... EX|PX|EXAT|PXAT <ttl>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub kind: ExpiryKind,
    pub ttl: i64,
}

// == Command ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    /// Arguments to send back
    Echo(Vec<String>),
    Set {
        key: String,
        value: String,
        expiry: Option<Expiry>,
    },
    Get {
        key: String,
    },
    Exists {
        keys: Vec<String>,
    },
    /// Anything else, carrying the name as received
    Unknown(String),
}

impl Command {
    /// Builds a command from request arguments; the first is the name.
    ///
    /// Names are matched without regard to ASCII case. Unrecognised names
    /// are not an error and come back as [`Command::Unknown`].
    pub fn parse(args: Vec<String>) -> Result<Command> {
        let mut args = args.into_iter();
        let name = args
            .next()
            .ok_or_else(|| ServerError::protocol("empty command"))?;
        let rest: Vec<String> = args.collect();

        match name.to_ascii_uppercase().as_str() {
            "PING" => Ok(Command::Ping),
            "ECHO" => {
                if rest.is_empty() {
                    return Err(wrong_arity("echo"));
                }
                Ok(Command::Echo(rest))
            }
            "SET" => parse_set(rest),
            "GET" => {
                let [key]: [String; 1] = rest.try_into().map_err(|_| wrong_arity("get"))?;
                Ok(Command::Get { key })
            }
            "EXISTS" => {
                if rest.is_empty() {
                    return Err(wrong_arity("exists"));
                }
                Ok(Command::Exists { keys: rest })
            }
            _ => Ok(Command::Unknown(name)),
        }
    }

    /// Upper-case command name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Command::Ping => "PING",
            Command::Echo(_) => "ECHO",
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Exists { .. } => "EXISTS",
            Command::Unknown(name) => name,
        }
    }
}

/// `SET key value [EX|PX|EXAT|PXAT ttl]`
///
/// The expiry pair is only read when it is the whole tail of the request and
/// the option names a known expiry kind. Any other tail is ignored and the
/// value is stored without expiry. A ttl of zero or less is accepted and
/// makes the entry expire on its next read.
fn parse_set(rest: Vec<String>) -> Result<Command> {
    let mut rest = rest.into_iter();
    let (Some(key), Some(value)) = (rest.next(), rest.next()) else {
        return Err(wrong_arity("set"));
    };
    let tail: Vec<String> = rest.collect();

    let expiry = match tail.as_slice() {
        [option, ttl] => match ExpiryKind::from_option(option) {
            Some(kind) => {
                let ttl = ttl.parse::<i64>().map_err(|_| {
                    ServerError::protocol("value is not an integer or out of range")
                })?;
                Some(Expiry { kind, ttl })
            }
            None => None,
        },
        _ => None,
    };

    Ok(Command::Set { key, value, expiry })
}

fn wrong_arity(command: &str) -> ServerError {
    ServerError::protocol(format!(
        "wrong number of arguments for '{}' command",
        command
    ))
}
