//! Forced, retrying deletion of workspace directories.
//!
//! This is the only code path that removes a workspace. Deletion walks the
//! tree contents-first so a single stubborn entry can be repaired and retried
//! in place; a failing walk is retried as a whole after a fixed delay.

use crate::domain::{DeletionOutcome, ReclaimConfig};
use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use walkdir::WalkDir;

/// How a single-entry delete failed.
#[derive(Debug)]
pub enum EntryFailure {
    /// Access was denied; relaxing permissions may let a retry succeed.
    RetryablePermission(io::Error),
    Fatal(io::Error),
}

impl EntryFailure {
    pub fn classify(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            EntryFailure::RetryablePermission(err)
        } else {
            EntryFailure::Fatal(err)
        }
    }

    fn into_inner(self) -> io::Error {
        match self {
            EntryFailure::RetryablePermission(err) | EntryFailure::Fatal(err) => err,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceReclaimer {
    max_retries: u32,
    delay: Duration,
}

impl Default for WorkspaceReclaimer {
    fn default() -> Self {
        Self::from_config(&ReclaimConfig::default())
    }
}

impl WorkspaceReclaimer {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries: max_retries.max(1), delay }
    }

    pub fn from_config(config: &ReclaimConfig) -> Self {
        Self::new(config.max_retries, config.delay())
    }

    /// Delete `path` and everything under it.
    ///
    /// A path that does not exist counts as deleted, so this is idempotent.
    /// Callers treat [`DeletionOutcome::Failed`] as non-fatal.
    pub fn reclaim(&self, path: &Path) -> DeletionOutcome {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            if !exists(path) {
                return DeletionOutcome::Deleted;
            }

            match remove_tree(path) {
                Ok(()) if !exists(path) => {
                    tracing::info!("Deleted {}", path.display());
                    return DeletionOutcome::Deleted;
                }
                Ok(()) => {
                    tracing::warn!("Delete of {} completed but the path still exists", path.display());
                    last_error = Some("path still exists after delete".to_string());
                }
                Err(err) => {
                    tracing::warn!(
                        "Attempt {}/{}: failed deleting {}: {}",
                        attempt,
                        self.max_retries,
                        path.display(),
                        err
                    );
                    last_error = Some(err.to_string());
                }
            }

            if attempt < self.max_retries {
                thread::sleep(self.delay);
            }
        }

        if exists(path) {
            tracing::warn!(
                "Failed to delete {} after {} attempts",
                path.display(),
                self.max_retries
            );
            DeletionOutcome::Failed { attempts: self.max_retries, last_error }
        } else {
            DeletionOutcome::Deleted
        }
    }
}

fn exists(path: &Path) -> bool {
    // symlink_metadata so a dangling symlink root still counts as present
    fs::symlink_metadata(path).is_ok()
}

fn remove_tree(root: &Path) -> io::Result<()> {
    let root_meta = fs::symlink_metadata(root)?;
    if !root_meta.is_dir() {
        return remove_entry(root, false);
    }

    for entry in WalkDir::new(root).contents_first(true).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // Unlistable directory: open it up so the next whole-tree attempt can descend.
                if let Some(path) = err.path() {
                    let _ = make_writable(path);
                }
                return Err(err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed")));
            }
        };
        remove_entry(entry.path(), entry.file_type().is_dir())?;
    }
    Ok(())
}

fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    match delete_once(path, is_dir) {
        Ok(()) => Ok(()),
        Err(EntryFailure::RetryablePermission(err)) => {
            tracing::debug!("Permission denied deleting {}: {}; retrying", path.display(), err);
            let _ = make_writable(path);
            if let Some(parent) = path.parent() {
                let _ = make_writable(parent);
            }
            delete_once(path, is_dir).map_err(EntryFailure::into_inner)
        }
        Err(EntryFailure::Fatal(err)) => Err(err),
    }
}

fn delete_once(path: &Path, is_dir: bool) -> Result<(), EntryFailure> {
    let result = if is_dir { fs::remove_dir(path) } else { fs::remove_file(path) };
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(EntryFailure::classify(err)),
    }
}

#[cfg(unix)]
fn make_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    let mut perms = meta.permissions();
    perms.set_mode(perms.mode() | 0o700);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_writable(path: &Path) -> io::Result<()> {
    let mut perms = fs::symlink_metadata(path)?.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}
