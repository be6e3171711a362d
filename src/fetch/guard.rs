//! Scoped ownership of a workspace.

use super::reclaim::WorkspaceReclaimer;
use crate::domain::{DeletionOutcome, Workspace};
use std::ops::Deref;

/// Owns a [`Workspace`] for the duration of one request and reclaims it on
/// drop, whether the request returned, failed, or unwound.
pub struct WorkspaceGuard {
    workspace: Workspace,
    reclaimer: WorkspaceReclaimer,
    released: bool,
}

impl WorkspaceGuard {
    pub fn new(workspace: Workspace, reclaimer: WorkspaceReclaimer) -> Self {
        Self { workspace, reclaimer, released: false }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Reclaim now and report the outcome instead of waiting for drop.
    pub fn release(mut self) -> DeletionOutcome {
        self.released = true;
        self.reclaim()
    }

    fn reclaim(&self) -> DeletionOutcome {
        tracing::info!("Cleaning up workspace {}", self.workspace.root.display());
        let outcome = self.reclaimer.reclaim(&self.workspace.root);
        if let DeletionOutcome::Failed { attempts, last_error } = &outcome {
            tracing::warn!(
                "Leaked workspace {} after {} attempts: {}",
                self.workspace.root.display(),
                attempts,
                last_error.as_deref().unwrap_or("unknown error")
            );
        }
        outcome
    }
}

impl Deref for WorkspaceGuard {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        &self.workspace
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.reclaim();
        }
    }
}
