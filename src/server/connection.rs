//! Connection Handler
//!
//! Serves exactly one request per connection:
//!
//! ```text
//! read once ──▶ parse request ──▶ parse command ──▶ dispatch ──▶ write reply
//!     │               │                 │                             │
//!     └── timeout / EOF └── -ERR reply ──┘                             ▼
//!                                                               shutdown socket
//! ```
//!
//! The whole request must arrive in a single read of at most
//! `read_buffer_size` bytes. The socket is shut down whatever the outcome.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::error::{Result, ServerError};
use crate::protocol::{parse_request, Command, Reply};
use crate::server::dispatch;

/// Per-connection limits.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Deadline for the single request read
    pub read_timeout: Duration,
    /// Deadline for writing the reply
    pub write_timeout: Duration,
    /// Largest request accepted, in bytes
    pub read_buffer_size: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            read_buffer_size: 1024,
        }
    }
}

/// One accepted client.
pub struct Connection<S> {
    stream: S,
    /// Peer address for logging
    peer: String,
    cache: SharedCache,
    settings: ConnectionSettings,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        cache: SharedCache,
        settings: ConnectionSettings,
    ) -> Self {
        Self {
            stream,
            peer: peer.into(),
            cache,
            settings,
        }
    }

    /// Serves the request, logs the outcome and closes the socket.
    ///
    /// Errors are returned for the caller's benefit only; they never affect
    /// the cache or other connections.
    pub async fn run(mut self) -> Result<()> {
        let result = self.serve().await;

        match &result {
            Ok(()) => debug!(peer = %self.peer, "request served"),
            Err(ServerError::Disconnected) => {
                debug!(peer = %self.peer, "client disconnected before sending a request")
            }
            Err(e) => warn!(peer = %self.peer, error = %e, "connection failed"),
        }

        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown failed");
        }
        result
    }

    async fn serve(&mut self) -> Result<()> {
        let request = self.read_request().await?;

        let command = match parse_request(&request).and_then(Command::parse) {
            Ok(command) => command,
            Err(e) => {
                self.write_reply(&Reply::error(&e)).await?;
                return Err(e);
            }
        };

        debug!(peer = %self.peer, command = command.name(), "received command");

        if let Some(reply) = dispatch(command, &self.cache).await {
            self.write_reply(&reply).await?;
        }
        Ok(())
    }

    async fn read_request(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.settings.read_buffer_size];

        let n = timeout(self.settings.read_timeout, self.stream.read(&mut buf))
            .await
            .map_err(|_| ServerError::Timeout("read"))??;

        if n == 0 {
            return Err(ServerError::Disconnected);
        }

        buf.truncate(n);
        Ok(buf)
    }

    async fn write_reply(&mut self, reply: &Reply) -> Result<()> {
        let bytes = reply.encode();
        let stream = &mut self.stream;

        timeout(self.settings.write_timeout, async {
            stream.write_all(&bytes).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| ServerError::Timeout("write"))??;

        Ok(())
    }
}
