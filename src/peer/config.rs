use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_TRACKER_HOST, DEFAULT_TRACKER_PORT, EPHEMERAL_PORT, RECONCILE_INTERVAL,
};

/// Runtime settings for a [`PeerNode`](super::PeerNode).
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Directory whose files are shared and where retrieved files land.
    pub directory: PathBuf,
    /// Host of the indexing server. Other peers are reached on this host too.
    pub tracker_host: String,
    pub tracker_port: u16,
    /// Port the file server listens on; `0` lets the OS choose. The bound
    /// port becomes the peer's identity.
    pub listen_port: u16,
    /// Delay between reconciliation passes.
    pub reconcile_interval: Duration,
}

impl PeerConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            tracker_host: DEFAULT_TRACKER_HOST.to_string(),
            tracker_port: DEFAULT_TRACKER_PORT,
            listen_port: EPHEMERAL_PORT,
            reconcile_interval: RECONCILE_INTERVAL,
        }
    }

    pub fn with_tracker(mut self, host: impl Into<String>, port: u16) -> Self {
        self.tracker_host = host.into();
        self.tracker_port = port;
        self
    }

    pub fn with_listen_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    pub fn with_reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }
}
