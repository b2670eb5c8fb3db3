//! Peer node: tracker client, directory reconciliation and file server.
//!
//! A peer shares the files of one directory. Its identity is the port its
//! [`FileServer`] listens on; it announces that identity to the indexing
//! server once and then keeps the tracker's view of its files up to date
//! with a polling [`Reconciler`].
//!
//! # Components
//!
//! - [`PeerNode`] - Starts and owns everything below
//! - [`TrackerClient`] - Register, deregister and search requests
//! - [`Reconciler`] - Periodic re-announcement of the directory snapshot
//! - [`FileServer`] - Answers direct file requests from other peers
//! - [`resolve_filename`] - Origin tagging for retrieved files that collide
//!   with a local one
//!
//! # Security
//!
//! Requested filenames are appended to the shared directory path as-is.
//! A name containing `..` can reach files outside the directory; peers are
//! assumed to trust each other.

mod config;
mod error;
mod file_server;
mod node;
mod reconciler;
mod retrieve;
mod snapshot;
mod tracker_client;

pub use crate::protocol::PeerIdentity;
pub use config::PeerConfig;
pub use error::PeerError;
pub use file_server::FileServer;
pub use node::PeerNode;
pub use reconciler::Reconciler;
pub use retrieve::{resolve_filename, RetrieveOutcome};
pub use snapshot::{reconcile_actions, scan_directory, Announcement, FileRecord};
pub use tracker_client::TrackerClient;
