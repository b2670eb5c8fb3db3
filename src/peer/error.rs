use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::{PeerIdentity, ProtocolError};

/// Errors that can occur while running a peer node.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Network or file I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A wire field could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The shared directory cannot be listed.
    #[error("invalid directory {}: {source}", path.display())]
    InvalidDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A peer asked to retrieve a file from itself.
    #[error("peer {0} is the current peer")]
    SelfRetrieve(PeerIdentity),
}
