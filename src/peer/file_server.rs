use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::File;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use super::error::PeerError;
use super::snapshot::path_in;
use crate::protocol::{FileStatus, PeerIdentity, ProtocolError, Transport};

/// Serves files of the shared directory to other peers.
///
/// Each connection carries exactly one request: the peer sends a filename,
/// the server answers with a status and, on success, the file's bytes, then
/// closes the connection.
pub struct FileServer {
    listener: TcpListener,
    directory: Arc<PathBuf>,
    identity: PeerIdentity,
}

impl FileServer {
    /// Binds on all interfaces. Port `0` picks an ephemeral port.
    pub async fn bind(directory: PathBuf, port: u16) -> Result<Self, PeerError> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        let local = listener.local_addr()?;
        let identity = PeerIdentity::new(local.port()).ok_or_else(|| {
            ProtocolError::InvalidIdentity(format!("bound to port {}", local.port()))
        })?;
        info!(addr = %local, peer = %identity, "file server bound");

        Ok(Self {
            listener,
            directory: Arc::new(directory),
            identity,
        })
    }

    pub fn identity(&self) -> PeerIdentity {
        self.identity
    }

    pub fn local_addr(&self) -> Result<SocketAddr, PeerError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(%addr, "client connection");
                    tokio::spawn(serve_request(stream, addr, self.directory.clone()));
                }
                Err(e) => {
                    warn!(error = %e, "failed client connection");
                }
            }
        }
    }
}

async fn serve_request(stream: TcpStream, addr: SocketAddr, directory: Arc<PathBuf>) {
    let mut transport = Transport::new(stream);

    if let Err(e) = answer(&mut transport, &directory).await {
        warn!(%addr, error = %e, "client unreachable");
    }
}

async fn answer(transport: &mut Transport, directory: &Path) -> Result<(), PeerError> {
    let name = transport.receive_name().await?;
    let path = path_in(directory, name.as_str());

    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            debug!(file = %name, error = %e, "requested file not found");
            transport.send_status(FileStatus::NotFound).await?;
            return Ok(());
        }
    };

    let metadata = match file.metadata().await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(file = %name, error = %e, "could not read file stats");
            transport.send_status(FileStatus::StatFailed).await?;
            return Ok(());
        }
    };

    if metadata.is_dir() {
        transport.send_status(FileStatus::NotFound).await?;
        return Ok(());
    }

    transport.send_status(FileStatus::Size(metadata.len())).await?;
    let sent = transport.send_body(&mut file).await?;
    info!(file = %name, bytes = sent, "file sent");

    Ok(())
}
