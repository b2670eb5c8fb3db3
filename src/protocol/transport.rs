use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use super::error::ProtocolError;
use super::identity::PeerIdentity;
use super::message::{decode_search_result, encode_search_result, FileName, FileStatus, RequestTag};
use crate::constants::{
    FILENAME_FIELD_SIZE, IDENTITY_FIELD_SIZE, READ_BUFFER_CAPACITY, REQUEST_TAG_SIZE,
    SEARCH_RESULT_FIELD_SIZE, STATUS_FIELD_SIZE,
};

/// Fixed-width field framing over a TCP stream.
///
/// Reads block until a whole field has arrived; there is no read or write
/// timeout, a stalled remote holds the session until the OS reports the
/// connection as failed.
pub struct Transport {
    stream: TcpStream,
    read_buf: BytesMut,
}

impl Transport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    pub async fn send_identity(&mut self, identity: PeerIdentity) -> Result<(), ProtocolError> {
        self.write_field(&identity.encode()).await
    }

    pub async fn receive_identity(&mut self) -> Result<PeerIdentity, ProtocolError> {
        let data = self.read_field(IDENTITY_FIELD_SIZE).await?;
        PeerIdentity::decode(&data)
    }

    pub async fn send_tag(&mut self, tag: RequestTag) -> Result<(), ProtocolError> {
        self.write_field(&[tag.as_byte()]).await
    }

    pub async fn receive_tag(&mut self) -> Result<RequestTag, ProtocolError> {
        let data = self.read_field(REQUEST_TAG_SIZE).await?;
        Ok(RequestTag::from(data[0]))
    }

    /// Sends a request tag and its filename as one write.
    pub async fn send_request(
        &mut self,
        tag: RequestTag,
        name: &FileName,
    ) -> Result<(), ProtocolError> {
        let mut frame = BytesMut::with_capacity(REQUEST_TAG_SIZE + FILENAME_FIELD_SIZE);
        frame.extend_from_slice(&[tag.as_byte()]);
        frame.extend_from_slice(&name.encode());
        self.write_field(&frame).await
    }

    pub async fn send_name(&mut self, name: &FileName) -> Result<(), ProtocolError> {
        self.write_field(&name.encode()).await
    }

    pub async fn receive_name(&mut self) -> Result<FileName, ProtocolError> {
        let data = self.read_field(FILENAME_FIELD_SIZE).await?;
        FileName::decode(&data)
    }

    pub async fn send_search_result(&mut self, peers: &[PeerIdentity]) -> Result<(), ProtocolError> {
        self.write_field(&encode_search_result(peers)).await
    }

    pub async fn receive_search_result(&mut self) -> Result<Vec<PeerIdentity>, ProtocolError> {
        let data = self.read_field(SEARCH_RESULT_FIELD_SIZE).await?;
        decode_search_result(&data)
    }

    pub async fn send_status(&mut self, status: FileStatus) -> Result<(), ProtocolError> {
        self.write_field(&status.encode()).await
    }

    pub async fn receive_status(&mut self) -> Result<FileStatus, ProtocolError> {
        let data = self.read_field(STATUS_FIELD_SIZE).await?;
        FileStatus::decode(&data)
    }

    /// Streams `reader` to the remote end until it is exhausted.
    pub async fn send_body<R>(&mut self, reader: &mut R) -> Result<u64, ProtocolError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let sent = tokio::io::copy(reader, &mut self.stream).await?;
        self.stream.flush().await?;
        Ok(sent)
    }

    /// Copies up to `len` body bytes from the connection into `writer`.
    ///
    /// The remote closing the connection early ends the copy without an
    /// error; the returned count tells how many bytes actually arrived.
    pub async fn receive_body<W>(&mut self, len: u64, writer: &mut W) -> Result<u64, ProtocolError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let buffered = (self.read_buf.len() as u64).min(len) as usize;
        let head = self.read_buf.split_to(buffered);
        writer.write_all(&head).await?;

        let remaining = len - buffered as u64;
        let mut body = (&mut self.stream).take(remaining);
        let copied = tokio::io::copy(&mut body, writer).await?;
        writer.flush().await?;

        Ok(buffered as u64 + copied)
    }

    pub async fn shutdown(&mut self) -> Result<(), ProtocolError> {
        self.stream.shutdown().await?;
        Ok(())
    }

    pub fn into_inner(self) -> TcpStream {
        self.stream
    }

    pub fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    async fn write_field(&mut self, data: &[u8]) -> Result<(), ProtocolError> {
        self.stream.write_all(data).await?;
        Ok(())
    }

    async fn read_field(&mut self, len: usize) -> Result<Bytes, ProtocolError> {
        while self.read_buf.len() < len {
            let n = self.stream.read_buf(&mut self.read_buf).await?;

            if n == 0 {
                return Err(ProtocolError::ConnectionClosed);
            }
        }

        Ok(self.read_buf.split_to(len).freeze())
    }
}
