use thiserror::Error;

/// Errors raised while encoding, decoding or exchanging wire fields.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Network I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote end closed the connection mid-field.
    #[error("connection closed")]
    ConnectionClosed,

    /// A filename does not fit in the filename field.
    #[error("filename too long: {0} bytes")]
    NameTooLong(usize),

    #[error("empty filename")]
    EmptyName,

    /// A filename contains a NUL byte or is not valid UTF-8.
    #[error("invalid filename: {0}")]
    InvalidName(String),

    #[error("invalid peer identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid file status: {0}")]
    InvalidStatus(String),

    #[error("invalid search result: {0}")]
    InvalidSearchResult(String),
}
