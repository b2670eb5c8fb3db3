//! Filename to peer index kept by the indexing server.
//!
//! The index answers one question: which peers currently serve a file with
//! this name? Peers add and remove themselves through [`FileIndex::register`]
//! and [`FileIndex::deregister`]; when a peer's tracker connection fails,
//! [`FileIndex::purge`] drops it from every entry.
//!
//! # Invariants
//!
//! - A filename is present only while at least one peer serves it.
//! - A peer appears at most once per filename.
//! - Every operation takes the same lock for its whole duration, so a
//!   search never observes a half-applied update.
//!
//! # Examples
//!
//! ```
//! use rshare::index::FileIndex;
//! use rshare::protocol::PeerIdentity;
//!
//! let index = FileIndex::new();
//! let peer = PeerIdentity::new(7).unwrap();
//!
//! index.register("a.txt", peer);
//! assert_eq!(index.search("a.txt"), vec![peer]);
//!
//! index.deregister("a.txt", peer);
//! assert!(index.search("a.txt").is_empty());
//! ```

mod file_index;

pub use file_index::FileIndex;
