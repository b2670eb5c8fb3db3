use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use super::error::ProtocolError;
use super::identity::PeerIdentity;
use crate::constants::{
    FILENAME_FIELD_SIZE, MAX_FILENAME_LEN, SEARCH_RESULT_FIELD_SIZE, STATUS_FIELD_SIZE,
    STATUS_NOT_FOUND, STATUS_STAT_FAILED,
};

/// Leading byte of every tracker request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTag {
    Disconnect,
    Register,
    Deregister,
    Search,
    /// Any byte the tracker does not understand. Handled like a disconnect.
    Unknown(u8),
}

impl RequestTag {
    pub fn as_byte(&self) -> u8 {
        match self {
            RequestTag::Disconnect => b'0',
            RequestTag::Register => b'1',
            RequestTag::Deregister => b'2',
            RequestTag::Search => b'3',
            RequestTag::Unknown(b) => *b,
        }
    }
}

impl From<u8> for RequestTag {
    fn from(value: u8) -> Self {
        match value {
            b'0' => RequestTag::Disconnect,
            b'1' => RequestTag::Register,
            b'2' => RequestTag::Deregister,
            b'3' => RequestTag::Search,
            other => RequestTag::Unknown(other),
        }
    }
}

/// A filename that fits the 256-byte filename field.
///
/// Names are UTF-8, between 1 and 255 bytes long and never contain a NUL.
/// Longer names are rejected rather than truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileName(String);

impl FileName {
    pub fn new(name: impl Into<String>) -> Result<Self, ProtocolError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ProtocolError::EmptyName);
        }
        if name.len() > MAX_FILENAME_LEN {
            return Err(ProtocolError::NameTooLong(name.len()));
        }
        if name.contains('\0') {
            return Err(ProtocolError::InvalidName(name.replace('\0', "\\0")));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Encodes the name NUL-padded to the full field width.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::zeroed(FILENAME_FIELD_SIZE);
        buf[..self.0.len()].copy_from_slice(self.0.as_bytes());
        buf.freeze()
    }

    /// Decodes a filename field, reading up to the first NUL.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        let name = std::str::from_utf8(&data[..end])
            .map_err(|_| ProtocolError::InvalidName(String::from_utf8_lossy(&data[..end]).into()))?;

        Self::new(name)
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FileName {
    type Error = ProtocolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A file server's answer to a file request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The file could not be opened (`-1`).
    NotFound,
    /// The file was opened but could not be stat'ed (`-2`).
    StatFailed,
    /// The file exists; exactly this many bytes follow.
    Size(u64),
}

impl FileStatus {
    pub fn code(&self) -> i64 {
        match self {
            FileStatus::NotFound => STATUS_NOT_FOUND,
            FileStatus::StatFailed => STATUS_STAT_FAILED,
            FileStatus::Size(n) => *n as i64,
        }
    }

    pub fn encode(&self) -> Bytes {
        let text = self.code().to_string();
        let len = text.len().min(STATUS_FIELD_SIZE);
        let mut buf = BytesMut::zeroed(STATUS_FIELD_SIZE);
        buf[..len].copy_from_slice(&text.as_bytes()[..len]);
        buf.freeze()
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        let text = std::str::from_utf8(&data[..end])
            .map_err(|_| ProtocolError::InvalidStatus("not utf-8".into()))?
            .trim();

        let code: i64 = text
            .parse()
            .map_err(|_| ProtocolError::InvalidStatus(text.to_string()))?;

        match code {
            STATUS_NOT_FOUND => Ok(FileStatus::NotFound),
            STATUS_STAT_FAILED => Ok(FileStatus::StatFailed),
            n if n >= 0 => Ok(FileStatus::Size(n as u64)),
            n => Err(ProtocolError::InvalidStatus(n.to_string())),
        }
    }
}

/// Encodes peer identities as a comma-separated list, NUL-padded to the
/// search result field width.
///
/// Identities that would overflow the field are dropped whole, so the field
/// always decodes to a well-formed list.
pub fn encode_search_result(peers: &[PeerIdentity]) -> Bytes {
    let mut buf = BytesMut::with_capacity(SEARCH_RESULT_FIELD_SIZE);

    for peer in peers {
        let id = peer.to_string();
        let needed = id.len() + usize::from(!buf.is_empty());
        // keep one byte for the terminating NUL
        if buf.len() + needed >= SEARCH_RESULT_FIELD_SIZE {
            break;
        }
        if !buf.is_empty() {
            buf.put_u8(b',');
        }
        buf.put_slice(id.as_bytes());
    }

    buf.resize(SEARCH_RESULT_FIELD_SIZE, 0);
    buf.freeze()
}

pub fn decode_search_result(data: &[u8]) -> Result<Vec<PeerIdentity>, ProtocolError> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let text = std::str::from_utf8(&data[..end])
        .map_err(|_| ProtocolError::InvalidSearchResult("not utf-8".into()))?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.split(',')
        .map(|id| {
            id.parse::<PeerIdentity>()
                .map_err(|_| ProtocolError::InvalidSearchResult(id.to_string()))
        })
        .collect()
}
