use std::path::PathBuf;

use tokio::fs::File;
use tracing::{info, warn};

use super::error::PeerError;
use crate::constants::ORIGIN_SUFFIX;
use crate::protocol::{FileName, FileStatus, PeerIdentity, Transport};

/// Result of asking another peer for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveOutcome {
    /// The file was written to `path`. `bytes` may be short of the announced
    /// size if the remote closed the connection early.
    Saved { path: PathBuf, bytes: u64 },
    /// The remote peer does not have the file.
    NotFound,
    /// The remote peer has the file but could not stat it.
    StatFailed,
}

/// Local name for a file retrieved from `source`.
///
/// When the retrieving peer already owns a file called `name`, the copy is
/// tagged with its origin, `<stem>-origin-<source><ext>`, where the extension
/// starts at the last `.`.
///
/// # Examples
///
/// ```
/// use rshare::peer::resolve_filename;
/// use rshare::protocol::PeerIdentity;
///
/// let source = PeerIdentity::new(5001).unwrap();
/// assert_eq!(resolve_filename("movie.mp4", source, true), "movie-origin-5001.mp4");
/// assert_eq!(resolve_filename("movie.mp4", source, false), "movie.mp4");
/// ```
pub fn resolve_filename(name: &str, source: PeerIdentity, already_owned: bool) -> String {
    if !already_owned {
        return name.to_string();
    }

    match name.rfind('.') {
        Some(idx) => format!("{}{}{}{}", &name[..idx], ORIGIN_SUFFIX, source, &name[idx..]),
        None => format!("{}{}{}", name, ORIGIN_SUFFIX, source),
    }
}

/// Requests `name` from the file server of `target` on `host`.
///
/// `destination` is evaluated only once the remote has confirmed the file
/// exists, so a failed request never creates a local file.
pub(crate) async fn fetch<F>(
    host: &str,
    target: PeerIdentity,
    name: &FileName,
    destination: F,
) -> Result<RetrieveOutcome, PeerError>
where
    F: FnOnce() -> PathBuf,
{
    let mut transport = Transport::connect((host, target.port())).await?;
    transport.send_name(name).await?;

    let size = match transport.receive_status().await? {
        FileStatus::NotFound => {
            info!(peer = %target, file = %name, "file does not exist");
            return Ok(RetrieveOutcome::NotFound);
        }
        FileStatus::StatFailed => {
            warn!(peer = %target, file = %name, "could not read file stats");
            return Ok(RetrieveOutcome::StatFailed);
        }
        FileStatus::Size(size) => size,
    };

    let path = destination();
    let mut file = File::create(&path).await?;
    let bytes = transport.receive_body(size, &mut file).await?;

    if bytes < size {
        warn!(peer = %target, file = %name, expected = size, received = bytes, "transfer ended early");
    }
    info!(peer = %target, file = %name, path = %path.display(), bytes, "file retrieved");

    Ok(RetrieveOutcome::Saved { path, bytes })
}
