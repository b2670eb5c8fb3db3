use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;
use tracing::warn;

use crate::protocol::{FileName, RequestTag};

/// One shareable file as seen during a directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: FileName,
    pub modified: SystemTime,
}

impl FileRecord {
    pub fn new(name: FileName, modified: SystemTime) -> Self {
        Self { name, modified }
    }
}

/// What a reconciliation pass tells the tracker about a previously known
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Register,
    Deregister,
}

impl Announcement {
    pub fn tag(&self) -> RequestTag {
        match self {
            Announcement::Register => RequestTag::Register,
            Announcement::Deregister => RequestTag::Deregister,
        }
    }
}

/// Builds the path of `name` inside `directory` by plain concatenation.
///
/// `..` components in `name` are not resolved or rejected, so a name can
/// reach outside `directory`.
pub(crate) fn path_in(directory: &Path, name: &str) -> PathBuf {
    let mut path = directory.as_os_str().to_owned();
    path.push("/");
    path.push(name);
    PathBuf::from(path)
}

/// Lists the shareable files of `directory`, sorted by name.
///
/// Hidden entries and directories are left out. Entries that cannot be
/// opened or stat'ed, or whose name does not fit the wire format, are
/// skipped with a warning. Only failing to read the directory itself is an
/// error.
pub async fn scan_directory(directory: &Path) -> std::io::Result<Vec<FileRecord>> {
    let mut entries = fs::read_dir(directory).await?;
    let mut records = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let Ok(raw_name) = entry.file_name().into_string() else {
            warn!(file = ?entry.file_name(), "unable to register, name is not utf-8");
            continue;
        };
        if raw_name.starts_with('.') {
            continue;
        }

        let modified = match stat_entry(&entry.path()).await {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                warn!(file = %raw_name, error = %e, "unable to register");
                continue;
            }
        };

        match FileName::new(raw_name) {
            Ok(name) => records.push(FileRecord::new(name, modified)),
            Err(e) => warn!(error = %e, "unable to register"),
        }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    records.dedup();
    Ok(records)
}

/// Returns the modification time of a regular entry, `None` for directories.
async fn stat_entry(path: &Path) -> std::io::Result<Option<SystemTime>> {
    let file = fs::File::open(path).await?;
    let metadata = file.metadata().await?;

    if metadata.is_dir() {
        return Ok(None);
    }
    metadata.modified().map(Some)
}

/// Decides what to announce for every file of the previous snapshot.
///
/// A previously known file that is still present with the same modification
/// time is registered again; one that vanished or changed is deregistered.
/// Files that only appear in `fresh` produce nothing: they become part of
/// the baseline and are announced by the following pass.
pub fn reconcile_actions<'a>(
    previous: &'a [FileRecord],
    fresh: &[FileRecord],
) -> Vec<(Announcement, &'a FileRecord)> {
    previous
        .iter()
        .map(|record| {
            let action = if fresh.contains(record) {
                Announcement::Register
            } else {
                Announcement::Deregister
            };
            (action, record)
        })
        .collect()
}
