//! Command dispatch against the shared cache.

use tracing::{debug, warn};

use crate::cache::{ExpiryKind, Lookup, SharedCache};
use crate::protocol::{Command, Reply};

/// Executes one command and returns the reply to send, if any.
///
/// PING and ECHO never touch the cache. GET takes the write lock because a
/// hit updates recency and an expired entry is dropped. Unknown commands
/// produce no reply.
pub async fn dispatch(command: Command, cache: &SharedCache) -> Option<Reply> {
    match command {
        Command::Ping => Some(Reply::pong()),
        Command::Echo(args) => Some(Reply::Array(args)),
        Command::Set { key, value, expiry } => {
            let (ttl, kind) = match expiry {
                Some(expiry) => (Some(expiry.ttl), expiry.kind),
                None => (None, ExpiryKind::None),
            };
            debug!(key = %key, expiry = kind.as_str(), ?ttl, "storing key");
            cache.write().await.set(key, value, ttl, kind);
            Some(Reply::ok())
        }
        Command::Get { key } => {
            let lookup = cache.write().await.get(&key);
            Some(match lookup {
                Lookup::Hit(value) => Reply::Bulk(value),
                Lookup::Expired | Lookup::Miss => Reply::Nil,
            })
        }
        Command::Exists { keys } => {
            let cache = cache.read().await;
            let count = keys.iter().filter(|key| cache.exists(key)).count();
            Some(Reply::Integer(count as i64))
        }
        Command::Unknown(name) => {
            warn!(command = %name, "unknown command, not replying");
            None
        }
    }
}
