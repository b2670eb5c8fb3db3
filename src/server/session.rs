use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::index::FileIndex;
use crate::protocol::{PeerIdentity, ProtocolError, RequestTag, Transport};

/// Why a session stopped serving requests.
#[derive(Debug)]
enum SessionEnd {
    Disconnected,
    UnexpectedRequest(u8),
    Failed(ProtocolError),
}

/// One peer's tracker connection.
pub(super) struct Session {
    transport: Transport,
    addr: SocketAddr,
    index: Arc<FileIndex>,
}

impl Session {
    pub(super) fn new(stream: TcpStream, addr: SocketAddr, index: Arc<FileIndex>) -> Self {
        Self {
            transport: Transport::new(stream),
            addr,
            index,
        }
    }

    pub(super) async fn run(mut self) {
        let identity = match self.transport.receive_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(addr = %self.addr, error = %e, "client unidentified, closing connection");
                return;
            }
        };
        debug!(addr = %self.addr, peer = %identity, "client identified");

        let end = self.serve(identity).await;
        let purged = self.index.purge(identity);

        match end {
            SessionEnd::Disconnected => {
                info!(peer = %identity, purged, "client disconnected");
            }
            SessionEnd::UnexpectedRequest(tag) => {
                warn!(peer = %identity, tag, purged, "unexpected request");
            }
            SessionEnd::Failed(ProtocolError::Io(e)) => {
                warn!(peer = %identity, error = %e, purged, "client unreachable");
            }
            SessionEnd::Failed(ProtocolError::ConnectionClosed) => {
                info!(peer = %identity, purged, "client unreachable");
            }
            SessionEnd::Failed(e) => {
                warn!(peer = %identity, error = %e, purged, "malformed request");
            }
        }
        debug!(files = self.index.file_count(), "closing connection and cleaning up index");
    }

    async fn serve(&mut self, identity: PeerIdentity) -> SessionEnd {
        loop {
            let tag = match self.transport.receive_tag().await {
                Ok(tag) => tag,
                Err(e) => return SessionEnd::Failed(e),
            };

            if let Err(end) = self.dispatch(tag, identity).await {
                return end;
            }
        }
    }

    async fn dispatch(&mut self, tag: RequestTag, identity: PeerIdentity) -> Result<(), SessionEnd> {
        match tag {
            RequestTag::Register => {
                let name = self.transport.receive_name().await.map_err(SessionEnd::Failed)?;
                if self.index.register(name.as_str(), identity) {
                    debug!(peer = %identity, file = %name, "registered");
                }
            }
            RequestTag::Deregister => {
                let name = self.transport.receive_name().await.map_err(SessionEnd::Failed)?;
                if self.index.deregister(name.as_str(), identity) {
                    debug!(peer = %identity, file = %name, "deregistered");
                }
            }
            RequestTag::Search => {
                let name = self.transport.receive_name().await.map_err(SessionEnd::Failed)?;
                let peers = self.index.search(name.as_str());
                debug!(peer = %identity, file = %name, found = peers.len(), "search");
                self.transport
                    .send_search_result(&peers)
                    .await
                    .map_err(SessionEnd::Failed)?;
            }
            RequestTag::Disconnect => return Err(SessionEnd::Disconnected),
            RequestTag::Unknown(tag) => return Err(SessionEnd::UnexpectedRequest(tag)),
        }

        Ok(())
    }
}
