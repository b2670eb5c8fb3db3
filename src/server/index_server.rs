use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{info, warn};

use super::error::ServerError;
use super::session::Session;
use crate::index::FileIndex;

/// Accepts peer connections and serves each one against a shared
/// [`FileIndex`].
pub struct IndexServer {
    listener: TcpListener,
    index: Arc<FileIndex>,
}

impl IndexServer {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, ServerError> {
        Self::with_index(addr, Arc::new(FileIndex::new())).await
    }

    /// Binds a server that serves an existing index.
    pub async fn with_index<A: ToSocketAddrs>(
        addr: A,
        index: Arc<FileIndex>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "indexing server bound");

        Ok(Self { listener, index })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn index(&self) -> &Arc<FileIndex> {
        &self.index
    }

    /// Accepts connections forever, spawning one detached session per peer.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "client connection");
                    let session = Session::new(stream, addr, self.index.clone());
                    tokio::spawn(session.run());
                }
                Err(e) => {
                    warn!(error = %e, "failed client connection, ignoring connection");
                }
            }
        }
    }
}
