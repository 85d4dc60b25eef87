//! TCP Listener
//!
//! Accepts connections and spawns one handler task per connection. A
//! semaphore caps how many connections are served at once; when every permit
//! is taken the accept loop waits instead of accepting.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::cache::SharedCache;
use crate::error::Result;
use crate::server::{Connection, ConnectionSettings};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The wire-protocol server.
pub struct Listener {
    listener: TcpListener,
    cache: SharedCache,
    limit: Arc<Semaphore>,
    settings: ConnectionSettings,
}

impl Listener {
    /// Binds the listening socket. A bind failure is returned to the caller.
    pub async fn bind(
        addr: impl ToSocketAddrs,
        cache: SharedCache,
        max_connections: usize,
        settings: ConnectionSettings,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            cache,
            limit: Arc::new(Semaphore::new(max_connections.max(1))),
            settings,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until the task is dropped.
    pub async fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "accepting wire protocol connections");

        loop {
            let Ok(permit) = self.limit.clone().acquire_owned().await else {
                // Only happens if the semaphore is closed
                return Ok(());
            };

            let (stream, addr) = accept_with_backoff(|| self.listener.accept()).await;

            let connection = Connection::new(
                stream,
                addr.to_string(),
                self.cache.clone(),
                self.settings.clone(),
            );

            tokio::spawn(async move {
                // Errors are logged inside run()
                let _ = connection.run().await;
                drop(permit);
            });
        }
    }
}

/// Retries `accept` until it succeeds, sleeping [`ACCEPT_BACKOFF`] after
/// each failure (EMFILE, ENFILE and the like).
async fn accept_with_backoff<T, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(e) => {
                error!(error = %e, "failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}
