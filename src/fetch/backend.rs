//! Clone transports.

use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, RemoteCallbacks};
use std::cell::Cell;
use std::path::Path;

/// One clone invocation.
#[derive(Debug, Clone)]
pub struct CloneRequest<'a> {
    pub url: &'a str,
    pub dest: &'a Path,
    pub branch: &'a str,
    /// 0 means full history.
    pub depth: i32,
    pub credential: Option<&'a str>,
}

/// Raw failure text, handed to the clone failure classifier.
#[derive(Debug, Clone)]
pub struct CloneFailure {
    pub raw: String,
}

impl CloneFailure {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl From<git2::Error> for CloneFailure {
    fn from(err: git2::Error) -> Self {
        Self::new(format!("{} [class={:?}; code={:?}]", err.message(), err.class(), err.code()))
    }
}

pub trait CloneBackend {
    fn name(&self) -> &'static str;
    /// Clone a single branch of `request.url` into `request.dest`.
    fn clone_repo(&self, request: &CloneRequest<'_>) -> Result<(), CloneFailure>;
}

/// libgit2-backed clone.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitBackend;

impl CloneBackend for GitBackend {
    fn name(&self) -> &'static str {
        "libgit2"
    }

    fn clone_repo(&self, request: &CloneRequest<'_>) -> Result<(), CloneFailure> {
        let mut callbacks = RemoteCallbacks::new();
        if let Some(token) = request.credential {
            let token = token.to_string();
            let asked = Cell::new(false);
            // Answer once; a second prompt means the token was rejected.
            callbacks.credentials(move |_url, username_from_url, _allowed| {
                if asked.replace(true) {
                    return Err(git2::Error::from_str("authentication failed: token rejected"));
                }
                Cred::userpass_plaintext(username_from_url.unwrap_or(token.as_str()), "")
            });
        }

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);
        if request.depth > 0 {
            fetch.depth(request.depth);
        }

        let refspec = format!("+refs/heads/{0}:refs/remotes/origin/{0}", request.branch);
        let mut builder = RepoBuilder::new();
        builder
            .branch(request.branch)
            .fetch_options(fetch)
            .remote_create(move |repo, name, url| repo.remote_with_fetch(name, url, &refspec));

        builder.clone(request.url, request.dest)?;
        Ok(())
    }
}
