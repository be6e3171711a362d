//! Workspace lifecycle types.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A request-scoped local checkout of one remote repository.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub repo_url: String,
    pub branch: String,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(root: PathBuf, repo_url: &str, branch: &str, created_at: DateTime<Utc>) -> Self {
        Self { root, repo_url: repo_url.to_string(), branch: branch.to_string(), created_at }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// What a caller asks the pipeline to fetch.
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub url: String,
    pub branch: String,
    pub credential: Option<String>,
}

impl RepoTarget {
    pub fn new(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self { url: url.into(), branch: branch.into(), credential: None }
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }
}

/// Result of reclaiming a workspace directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    Failed { attempts: u32, last_error: Option<String> },
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted)
    }
}
