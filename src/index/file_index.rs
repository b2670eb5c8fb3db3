use std::collections::HashMap;

use parking_lot::Mutex;

use crate::protocol::PeerIdentity;

/// Thread-safe mapping from filename to the peers serving it.
///
/// Peers are kept in registration order, which makes search results
/// deterministic for a given sequence of updates.
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: Mutex<HashMap<String, Vec<PeerIdentity>>>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `peer` to the holders of `name`.
    ///
    /// Returns `false` if the peer was already registered.
    pub fn register(&self, name: &str, peer: PeerIdentity) -> bool {
        let mut entries = self.entries.lock();
        let peers = entries.entry(name.to_string()).or_default();

        if peers.contains(&peer) {
            return false;
        }
        peers.push(peer);
        true
    }

    /// Removes `peer` from the holders of `name`, dropping the entry once
    /// nobody holds it.
    ///
    /// Returns `false` if the peer was not registered.
    pub fn deregister(&self, name: &str, peer: PeerIdentity) -> bool {
        let mut entries = self.entries.lock();
        let Some(peers) = entries.get_mut(name) else {
            return false;
        };

        let before = peers.len();
        peers.retain(|p| *p != peer);
        let removed = peers.len() != before;

        if peers.is_empty() {
            entries.remove(name);
        }
        removed
    }

    pub fn search(&self, name: &str) -> Vec<PeerIdentity> {
        self.entries.lock().get(name).cloned().unwrap_or_default()
    }

    /// Removes `peer` from every entry.
    ///
    /// Returns the number of filenames the peer was removed from.
    pub fn purge(&self, peer: PeerIdentity) -> usize {
        let mut entries = self.entries.lock();
        let mut removed = 0;

        entries.retain(|_, peers| {
            let before = peers.len();
            peers.retain(|p| *p != peer);
            if peers.len() != before {
                removed += 1;
            }
            !peers.is_empty()
        });

        removed
    }

    /// Number of distinct filenames currently served by at least one peer.
    pub fn file_count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
