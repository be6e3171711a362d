//! Repository fetching and workspace lifecycle

pub mod backend;
pub mod classify;
pub mod guard;
pub mod reclaim;
pub mod source;

pub use backend::{CloneBackend, CloneFailure, CloneRequest, GitBackend};
pub use classify::{classify_clone_failure, ClassifyFn};
pub use guard::WorkspaceGuard;
pub use reclaim::WorkspaceReclaimer;
pub use source::{authenticate, authenticated_url, derive_repo_name, RepositorySource};
