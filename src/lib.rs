//! rshare - Tracker-coordinated peer-to-peer file sharing
//!
//! An indexing server (tracker) records which peers currently serve which
//! files. Peers announce their shared directory to the tracker, look up
//! holders of a file through it, and then fetch the file directly from one
//! of those peers.
//!
//! # Modules
//!
//! - [`protocol`] - Fixed-width wire fields and the TCP transport
//! - [`index`] - Concurrent filename to peer index
//! - [`server`] - Indexing server and its per-connection sessions
//! - [`peer`] - Peer node: tracker client, reconciliation, file server
//! - [`constants`] - Ports, field widths and timing defaults
//!
//! # Examples
//!
//! ```no_run
//! use rshare::peer::{PeerConfig, PeerNode};
//! use rshare::protocol::FileName;
//! use rshare::server::IndexServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = IndexServer::bind("127.0.0.1:9999").await?;
//! tokio::spawn(tracker.run());
//!
//! let node = PeerNode::start(PeerConfig::new("./shared")).await?;
//! let holders = node.search(&FileName::new("a.txt")?).await?;
//! println!("a.txt is served by {:?}", holders);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod index;
pub mod peer;
pub mod protocol;
pub mod server;

pub use index::FileIndex;
pub use peer::{
    FileRecord, FileServer, PeerConfig, PeerError, PeerNode, Reconciler, RetrieveOutcome,
    TrackerClient,
};
pub use protocol::{FileName, FileStatus, PeerIdentity, ProtocolError, RequestTag, Transport};
pub use server::{IndexServer, ServerError};
