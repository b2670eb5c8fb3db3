use std::fmt;
use std::str::FromStr;

use super::error::ProtocolError;
use crate::constants::IDENTITY_FIELD_SIZE;

/// Identifies a peer on the network.
///
/// A peer's identity is the TCP port its file server listens on. The same
/// number is announced to the tracker once per connection and handed out in
/// search results, so other peers can connect to it directly.
///
/// # Wire format
///
/// Four bytes, little-endian signed integer. Only `1..=65535` is a valid
/// identity.
///
/// # Examples
///
/// ```
/// use rshare::protocol::PeerIdentity;
///
/// let id: PeerIdentity = "5001".parse().unwrap();
/// assert_eq!(id.port(), 5001);
///
/// let decoded = PeerIdentity::decode(&id.encode()).unwrap();
/// assert_eq!(decoded, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerIdentity(u16);

impl PeerIdentity {
    /// Creates an identity from a listening port.
    ///
    /// Returns `None` for port 0, which no peer can be reached on.
    pub fn new(port: u16) -> Option<Self> {
        if port == 0 {
            None
        } else {
            Some(Self(port))
        }
    }

    pub fn port(&self) -> u16 {
        self.0
    }

    pub fn encode(&self) -> [u8; IDENTITY_FIELD_SIZE] {
        i32::from(self.0).to_le_bytes()
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let bytes: [u8; IDENTITY_FIELD_SIZE] = data
            .get(..IDENTITY_FIELD_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ProtocolError::InvalidIdentity(format!("{} bytes", data.len())))?;

        let raw = i32::from_le_bytes(bytes);
        u16::try_from(raw)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ProtocolError::InvalidIdentity(raw.to_string()))
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PeerIdentity {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ProtocolError::InvalidIdentity(s.to_string()))
    }
}
