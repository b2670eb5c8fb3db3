use std::time::{SystemTime, UNIX_EPOCH};

use tokio::net::ToSocketAddrs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::PeerError;
use super::snapshot::Announcement;
use crate::protocol::{FileName, PeerIdentity, RequestTag, Transport};

/// A peer's persistent connection to the indexing server.
///
/// The connection is shared by the reconciliation task and interactive
/// requests; each request (and, for searches, its response) holds the
/// connection exclusively so messages from different tasks never
/// interleave on the wire.
pub struct TrackerClient {
    transport: Mutex<Transport>,
    identity: PeerIdentity,
}

impl TrackerClient {
    /// Connects to the tracker and announces `identity`.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        identity: PeerIdentity,
    ) -> Result<Self, PeerError> {
        let mut transport = Transport::connect(addr).await?;
        transport.send_identity(identity).await?;
        info!(tracker = %transport.peer_addr()?, peer = %identity, "connected to indexing server");

        Ok(Self {
            transport: Mutex::new(transport),
            identity,
        })
    }

    pub fn identity(&self) -> PeerIdentity {
        self.identity
    }

    pub async fn register(&self, name: &FileName) -> Result<(), PeerError> {
        self.announce(Announcement::Register, name).await
    }

    pub async fn deregister(&self, name: &FileName) -> Result<(), PeerError> {
        self.announce(Announcement::Deregister, name).await
    }

    pub async fn announce(&self, action: Announcement, name: &FileName) -> Result<(), PeerError> {
        self.transport
            .lock()
            .await
            .send_request(action.tag(), name)
            .await?;
        Ok(())
    }

    /// Asks the tracker which peers serve `name`. An empty result means the
    /// file was not found.
    pub async fn search(&self, name: &FileName) -> Result<Vec<PeerIdentity>, PeerError> {
        let start = unix_micros();

        let peers = {
            let mut transport = self.transport.lock().await;
            transport.send_request(RequestTag::Search, name).await?;
            transport.receive_search_result().await?
        };

        let end = unix_micros();
        debug!(
            file = %name,
            start,
            end,
            elapsed_us = end.saturating_sub(start),
            found = peers.len(),
            "search request"
        );
        Ok(peers)
    }

    /// Tells the tracker this peer is leaving and closes the connection.
    pub async fn disconnect(&self) -> Result<(), PeerError> {
        let mut transport = self.transport.lock().await;
        transport.send_tag(RequestTag::Disconnect).await?;
        transport.shutdown().await?;
        info!(peer = %self.identity, "disconnected from indexing server");
        Ok(())
    }
}

fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}
