use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use super::config::PeerConfig;
use super::error::PeerError;
use super::file_server::FileServer;
use super::reconciler::Reconciler;
use super::retrieve::{fetch, resolve_filename, RetrieveOutcome};
use super::snapshot::{path_in, scan_directory, FileRecord};
use super::tracker_client::TrackerClient;
use crate::protocol::{FileName, PeerIdentity};

/// A running peer: tracker client, reconciliation task and file server
/// sharing one identity.
///
/// # Examples
///
/// ```no_run
/// use rshare::peer::{PeerConfig, PeerNode};
/// use rshare::protocol::FileName;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let node = PeerNode::start(PeerConfig::new("./shared")).await?;
///
/// let name = FileName::new("a.txt")?;
/// let holders = node.search(&name).await?;
/// if let Some(&holder) = holders.iter().find(|&&p| p != node.identity()) {
///     node.retrieve(holder, &name).await?;
/// }
///
/// node.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct PeerNode {
    config: PeerConfig,
    identity: PeerIdentity,
    tracker: Arc<TrackerClient>,
    snapshot: Arc<RwLock<Vec<FileRecord>>>,
    server_task: JoinHandle<()>,
    reconcile_task: JoinHandle<()>,
}

impl PeerNode {
    /// Scans the shared directory, starts the file server, connects to the
    /// tracker and launches reconciliation.
    ///
    /// Fails if the directory cannot be listed, the file server cannot bind
    /// or the tracker is unreachable.
    pub async fn start(config: PeerConfig) -> Result<Self, PeerError> {
        let initial = scan_directory(&config.directory)
            .await
            .map_err(|source| PeerError::InvalidDirectory {
                path: config.directory.clone(),
                source,
            })?;

        let server = FileServer::bind(config.directory.clone(), config.listen_port).await?;
        let identity = server.identity();

        let tracker = Arc::new(
            TrackerClient::connect(
                (config.tracker_host.as_str(), config.tracker_port),
                identity,
            )
            .await?,
        );

        info!(
            peer = %identity,
            directory = %config.directory.display(),
            files = initial.len(),
            "peer started"
        );

        let snapshot = Arc::new(RwLock::new(initial));
        let server_task = tokio::spawn(server.run());
        let reconcile_task = Reconciler::new(
            tracker.clone(),
            config.directory.clone(),
            snapshot.clone(),
            config.reconcile_interval,
        )
        .spawn();

        Ok(Self {
            config,
            identity,
            tracker,
            snapshot,
            server_task,
            reconcile_task,
        })
    }

    pub fn identity(&self) -> PeerIdentity {
        self.identity
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    /// The last snapshot announced to the tracker.
    pub fn files(&self) -> Vec<FileRecord> {
        self.snapshot.read().clone()
    }

    pub async fn search(&self, name: &FileName) -> Result<Vec<PeerIdentity>, PeerError> {
        self.tracker.search(name).await
    }

    /// Downloads `name` from `target` into the shared directory.
    ///
    /// If this peer already announces a file with the same name, the copy is
    /// saved under [`resolve_filename`]'s origin-tagged name instead.
    pub async fn retrieve(
        &self,
        target: PeerIdentity,
        name: &FileName,
    ) -> Result<RetrieveOutcome, PeerError> {
        if target == self.identity {
            return Err(PeerError::SelfRetrieve(target));
        }

        fetch(&self.config.tracker_host, target, name, || {
            let owned = self.snapshot.read().iter().any(|r| r.name == *name);
            let local = resolve_filename(name.as_str(), target, owned);
            path_in(&self.config.directory, &local)
        })
        .await
    }

    /// Stops reconciliation, leaves the tracker and stops serving files.
    pub async fn shutdown(self) -> Result<(), PeerError> {
        self.reconcile_task.abort();
        let result = self.tracker.disconnect().await;
        self.server_task.abort();
        result
    }
}

impl Drop for PeerNode {
    fn drop(&mut self) {
        self.reconcile_task.abort();
        self.server_task.abort();
    }
}
