use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::snapshot::{reconcile_actions, scan_directory, FileRecord};
use super::tracker_client::TrackerClient;

/// Periodically re-scans the shared directory and re-announces the last
/// known snapshot to the tracker.
///
/// Every pass sends one message per file of the previous snapshot:
/// REGISTER if the file is still there unchanged, DEREGISTER otherwise.
/// The fresh scan then replaces the snapshot. New files are therefore first
/// announced one pass after they appear.
pub struct Reconciler {
    client: Arc<TrackerClient>,
    directory: PathBuf,
    snapshot: Arc<RwLock<Vec<FileRecord>>>,
    interval: Duration,
}

impl Reconciler {
    pub fn new(
        client: Arc<TrackerClient>,
        directory: PathBuf,
        snapshot: Arc<RwLock<Vec<FileRecord>>>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            directory,
            snapshot,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs passes forever, sleeping `interval` after each one.
    pub async fn run(self) {
        loop {
            self.reconcile_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Runs a single pass and returns how many announcements reached the
    /// tracker.
    ///
    /// Send failures are logged and skipped; the snapshot is replaced even
    /// when some announcements failed. A failed scan leaves the snapshot
    /// untouched.
    pub async fn reconcile_once(&self) -> usize {
        let fresh = match scan_directory(&self.directory).await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(
                    directory = %self.directory.display(),
                    error = %e,
                    "unable to scan directory, skipping reconciliation"
                );
                return 0;
            }
        };

        let previous = self.snapshot.read().clone();
        let mut sent = 0;

        for (action, record) in reconcile_actions(&previous, &fresh) {
            match self.client.announce(action, &record.name).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!(file = %record.name, ?action, error = %e, "failed to announce file");
                }
            }
        }

        debug!(announced = sent, known = previous.len(), scanned = fresh.len(), "reconciled");
        *self.snapshot.write() = fresh;
        sent
    }
}
