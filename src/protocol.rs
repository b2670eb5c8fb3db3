//! Tracker and peer wire protocol.
//!
//! Every message on the network is built from a handful of fixed-width
//! fields: a 4-byte peer identity, a 1-byte request tag, a 256-byte
//! NUL-padded filename, a 4096-byte search result and a 16-byte decimal file
//! status. File contents follow a status field as a raw byte stream.
//!
//! # Sessions
//!
//! | Session | Exchange |
//! |---|---|
//! | peer → tracker | identity once, then `tag [filename]` requests until disconnect |
//! | peer → peer | filename, then status, then `size` raw bytes |
//!
//! [`Transport`] wraps a TCP stream and reads/writes these fields.

mod error;
mod identity;
mod message;
mod transport;

pub use error::ProtocolError;
pub use identity::PeerIdentity;
pub use message::{decode_search_result, encode_search_result, FileName, FileStatus, RequestTag};
pub use transport::Transport;

#[cfg(test)]
mod tests;
