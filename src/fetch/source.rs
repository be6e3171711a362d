//! Materialize a remote repository into a fresh workspace.

use super::backend::{CloneBackend, CloneFailure, CloneRequest, GitBackend};
use super::classify::{cause_hint, classify_clone_failure, is_shallow_unsupported, ClassifyFn};
use super::reclaim::WorkspaceReclaimer;
use crate::domain::{Config, DeletionOutcome, Workspace};
use crate::error::{CloneCause, PipelineError};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

static REPO_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([^/]+?)(\.git)?$").unwrap());
static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

const SHALLOW_DEPTH: i32 = 1;

pub struct RepositorySource {
    temp_root: PathBuf,
    prefix: String,
    token_hosts: Vec<String>,
    reclaimer: WorkspaceReclaimer,
    backend: Box<dyn CloneBackend + Send + Sync>,
    classifier: ClassifyFn,
}

impl RepositorySource {
    pub fn new(
        temp_root: PathBuf,
        reclaimer: WorkspaceReclaimer,
        backend: Box<dyn CloneBackend + Send + Sync>,
    ) -> Self {
        Self {
            temp_root,
            prefix: "repo-ask".to_string(),
            token_hosts: vec!["github.com".to_string()],
            reclaimer,
            backend,
            classifier: classify_clone_failure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.resolved_temp_root(),
            WorkspaceReclaimer::from_config(&config.reclaim),
            Box::new(GitBackend),
        )
        .prefix(&config.workspace_prefix)
        .token_hosts(config.token_hosts.clone())
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn token_hosts(mut self, hosts: Vec<String>) -> Self {
        self.token_hosts = hosts;
        self
    }

    pub fn classifier(mut self, classifier: ClassifyFn) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn reclaimer(&self) -> &WorkspaceReclaimer {
        &self.reclaimer
    }

    /// Shallow-clone `branch` of `url` into a new uniquely named directory.
    ///
    /// On failure nothing is left behind (best effort) and the clone error
    /// carries a classified cause.
    pub fn fetch(
        &self,
        url: &str,
        branch: &str,
        credential: Option<&str>,
    ) -> Result<Workspace, PipelineError> {
        let name = derive_repo_name(url)?;
        let created_at = Utc::now();
        let nanos = created_at.timestamp_nanos_opt().unwrap_or_default();
        let dest =
            self.temp_root.join(format!("{}_{}_{}_{}", self.prefix, name, std::process::id(), nanos));

        clear_collision(&dest, |path| self.reclaimer.reclaim(path))?;
        std::fs::create_dir_all(&self.temp_root).map_err(|e| {
            PipelineError::Setup(format!(
                "Failed creating temp root {}: {}",
                self.temp_root.display(),
                e
            ))
        })?;

        let (clone_url, presented) = authenticate(url, credential, &self.token_hosts);
        tracing::info!("Cloning {} (branch: {}) into {}", url, branch, dest.display());

        match self.clone_into(&clone_url, &dest, branch, presented) {
            Ok(()) => {
                tracing::info!("Cloned {} via {}", url, self.backend.name());
                Ok(Workspace::new(dest, url, branch, created_at))
            }
            Err(failure) => {
                let raw = redact(&failure.raw, credential);
                let cause = (self.classifier)(&raw);
                let message = format!(
                    "Failed to clone repository: {}. {}",
                    raw,
                    cause_hint(cause, branch)
                );
                tracing::warn!("Clone of {} failed ({}): {}", url, cause, raw);

                let outcome = self.reclaimer.reclaim(&dest);
                if !outcome.is_deleted() {
                    tracing::warn!("Leaving partial clone behind at {}: {:?}", dest.display(), outcome);
                }
                Err(PipelineError::Clone { cause, message, raw })
            }
        }
    }

    fn clone_into(
        &self,
        url: &str,
        dest: &Path,
        branch: &str,
        credential: Option<&str>,
    ) -> Result<(), CloneFailure> {
        let mut request = CloneRequest { url, dest, branch, depth: SHALLOW_DEPTH, credential };
        match self.backend.clone_repo(&request) {
            Err(failure) if is_shallow_unsupported(&failure.raw) => {
                tracing::debug!("Shallow clone unsupported by transport, retrying full clone");
                if !self.reclaimer.reclaim(dest).is_deleted() {
                    return Err(failure);
                }
                request.depth = 0;
                self.backend.clone_repo(&request)
            }
            other => other,
        }
    }
}

/// Last path segment of `url` with any `.git` suffix removed.
pub fn derive_repo_name(url: &str) -> Result<String, PipelineError> {
    let trimmed = url.trim().trim_end_matches('/');
    let name = REPO_NAME
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .ok_or_else(|| PipelineError::InvalidUrl { url: url.to_string() })?;
    Ok(UNSAFE_NAME_CHARS.replace_all(name, "_").into_owned())
}

/// Embed `credential` as URL user-info when the host expects token auth.
///
/// Only `http`/`https` URLs on a configured host (or its subdomains) are
/// rewritten; every other URL is returned unchanged.
pub fn authenticated_url(url: &str, credential: Option<&str>, token_hosts: &[String]) -> String {
    authenticate(url, credential, token_hosts).0
}

/// Clone URL plus the credential the backend may present.
///
/// The credential survives only when it was embedded for a token host, so
/// other servers never see it, even when they prompt for auth.
pub fn authenticate<'a>(
    url: &str,
    credential: Option<&'a str>,
    token_hosts: &[String],
) -> (String, Option<&'a str>) {
    let unchanged = || (url.to_string(), None);
    let Some(token) = credential else {
        return unchanged();
    };
    let Ok(mut parsed) = Url::parse(url) else {
        return unchanged();
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return unchanged();
    }
    let host = parsed.host_str().unwrap_or("").to_ascii_lowercase();
    let wants_token = token_hosts.iter().any(|h| {
        let h = h.to_ascii_lowercase();
        host == h || host.ends_with(&format!(".{h}"))
    });
    if !wants_token || parsed.set_username(token).is_err() {
        return unchanged();
    }
    (parsed.to_string(), Some(token))
}

/// Remove a leftover directory at `dest` before cloning into it.
fn clear_collision(
    dest: &Path,
    reclaim: impl FnOnce(&Path) -> DeletionOutcome,
) -> Result<(), PipelineError> {
    if !dest.exists() {
        return Ok(());
    }
    tracing::info!("Directory {} exists, removing before clone", dest.display());
    match reclaim(dest) {
        DeletionOutcome::Deleted => Ok(()),
        DeletionOutcome::Failed { .. } => Err(PipelineError::Setup(format!(
            "Failed to clean up existing directory: {}",
            dest.display()
        ))),
    }
}

fn redact(raw: &str, credential: Option<&str>) -> String {
    match credential {
        Some(token) if !token.is_empty() => raw.replace(token, "***"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_derive_repo_name() {
        assert_eq!(derive_repo_name("https://github.com/owner/repo.git").unwrap(), "repo");
        assert_eq!(derive_repo_name("https://github.com/owner/repo").unwrap(), "repo");
        assert_eq!(derive_repo_name("https://github.com/owner/repo/").unwrap(), "repo");
        assert_eq!(derive_repo_name("file:///tmp/fixtures/demo").unwrap(), "demo");
        assert_eq!(derive_repo_name("https://host/o/we ird").unwrap(), "we_ird");
    }

    #[test]
    fn test_derive_repo_name_rejects_segmentless_input() {
        assert!(matches!(derive_repo_name(""), Err(PipelineError::InvalidUrl { .. })));
        assert!(matches!(derive_repo_name("not-a-url"), Err(PipelineError::InvalidUrl { .. })));
        assert!(matches!(derive_repo_name("https://x/.."), Err(PipelineError::InvalidUrl { .. })));
    }

    #[test]
    fn test_authenticated_url_embeds_token_for_github() {
        let hosts = vec!["github.com".to_string()];
        assert_eq!(
            authenticated_url("https://github.com/o/r.git", Some("tok123"), &hosts),
            "https://tok123@github.com/o/r.git"
        );
        assert_eq!(
            authenticated_url("http://github.com/o/r", Some("tok123"), &hosts),
            "http://tok123@github.com/o/r"
        );
    }

    #[test]
    fn test_authenticated_url_leaves_other_urls_alone() {
        let hosts = vec!["github.com".to_string()];
        assert_eq!(
            authenticated_url("https://gitlab.com/o/r.git", Some("tok"), &hosts),
            "https://gitlab.com/o/r.git"
        );
        assert_eq!(
            authenticated_url("git@github.com:o/r.git", Some("tok"), &hosts),
            "git@github.com:o/r.git"
        );
        assert_eq!(
            authenticated_url("https://github.com/o/r.git", None, &hosts),
            "https://github.com/o/r.git"
        );
    }

    #[test]
    fn test_redact_hides_token() {
        assert_eq!(redact("bad url https://abc@github.com", Some("abc")), "bad url https://***@github.com");
        assert_eq!(redact("plain", None), "plain");
    }

    /// Backend that records requests and replays scripted results.
    struct ScriptedBackend {
        results: Mutex<Vec<Result<(), CloneFailure>>>,
        depths: Mutex<Vec<i32>>,
        /// `(url, credential)` of every request, shared with the test.
        seen: Arc<Mutex<Vec<(String, Option<String>)>>>,
        create_dest: bool,
    }

    impl ScriptedBackend {
        fn new(results: Vec<Result<(), CloneFailure>>, create_dest: bool) -> Self {
            Self {
                results: Mutex::new(results),
                depths: Mutex::new(Vec::new()),
                seen: Arc::default(),
                create_dest,
            }
        }
    }

    impl CloneBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn clone_repo(&self, request: &CloneRequest<'_>) -> Result<(), CloneFailure> {
            self.depths.lock().unwrap().push(request.depth);
            self.seen
                .lock()
                .unwrap()
                .push((request.url.to_string(), request.credential.map(str::to_string)));
            if self.create_dest {
                std::fs::create_dir_all(request.dest.join(".git")).unwrap();
                std::fs::write(request.dest.join("partial.txt"), "x").unwrap();
            }
            self.results.lock().unwrap().remove(0)
        }
    }

    fn source_with(tmp: &TempDir, backend: ScriptedBackend) -> RepositorySource {
        RepositorySource::new(
            tmp.path().to_path_buf(),
            WorkspaceReclaimer::new(2, std::time::Duration::from_millis(1)),
            Box::new(backend),
        )
    }

    #[test]
    fn test_failed_clone_is_classified_and_cleaned_up() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new(
            vec![Err(CloneFailure::new("reference 'refs/remotes/origin/nope' not found"))],
            true,
        );
        let source = source_with(&tmp, backend);

        let err = source.fetch("https://example.com/o/demo.git", "nope", None).unwrap_err();
        assert_eq!(err.clone_cause(), Some(CloneCause::BranchNotFound));
        assert!(err.to_string().contains("Please ensure the branch 'nope' exists."));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0, "partial clone removed");
    }

    #[test]
    fn test_shallow_unsupported_falls_back_to_full_clone() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new(
            vec![
                Err(CloneFailure::new("shallow fetch is not supported by the local transport")),
                Ok(()),
            ],
            true,
        );
        let source = source_with(&tmp, backend);

        let ws = source.fetch("file:///srv/git/demo", "main", None).unwrap();
        assert!(ws.root.join(".git").is_dir());
        assert_eq!(ws.branch, "main");
        let name = ws.root.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("repo-ask_demo_"), "unexpected name {name}");
    }

    #[test]
    fn test_custom_classifier_is_used() {
        fn always_auth(_: &str) -> CloneCause {
            CloneCause::AuthenticationFailure
        }
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new(vec![Err(CloneFailure::new("weird"))], false);
        let source = source_with(&tmp, backend).classifier(always_auth);

        let err = source.fetch("https://github.com/o/r", "main", Some("secret")).unwrap_err();
        assert_eq!(err.clone_cause(), Some(CloneCause::AuthenticationFailure));
        assert!(!err.to_string().contains("secret"));
    }
    #[test]
    fn test_credential_withheld_from_other_hosts() {
        let tmp = TempDir::new().unwrap();
        let backend = ScriptedBackend::new(vec![Ok(()), Ok(())], true);
        let seen = Arc::clone(&backend.seen);
        let source = source_with(&tmp, backend);

        source.fetch("https://evil.example.com/o/r.git", "main", Some("ghp_SECRET")).unwrap();
        source.fetch("https://github.com/o/r.git", "main", Some("ghp_SECRET")).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], ("https://evil.example.com/o/r.git".to_string(), None));
        assert_eq!(
            seen[1],
            ("https://ghp_SECRET@github.com/o/r.git".to_string(), Some("ghp_SECRET".to_string()))
        );
    }

    #[test]
    fn test_authenticate_pairs_url_and_credential() {
        let hosts = vec!["github.com".to_string()];
        assert_eq!(
            authenticate("https://api.github.com/o/r", Some("t"), &hosts),
            ("https://t@api.github.com/o/r".to_string(), Some("t"))
        );
        assert_eq!(
            authenticate("ssh://git@github.com/o/r.git", Some("t"), &hosts),
            ("ssh://git@github.com/o/r.git".to_string(), None)
        );
    }

    #[test]
    fn test_collision_is_cleared_before_clone() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("stale");
        std::fs::create_dir_all(stale.join("nested")).unwrap();
        std::fs::write(stale.join("nested/file.txt"), "old").unwrap();

        let reclaimer = WorkspaceReclaimer::new(2, std::time::Duration::from_millis(1));
        clear_collision(&stale, |path| reclaimer.reclaim(path)).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_unremovable_collision_is_a_setup_error() {
        let tmp = TempDir::new().unwrap();
        let stale = tmp.path().join("stale");
        std::fs::create_dir_all(&stale).unwrap();

        let err = clear_collision(&stale, |_| DeletionOutcome::Failed {
            attempts: 3,
            last_error: Some("busy".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::Setup(_)));
        assert!(err.to_string().contains("Failed to clean up existing directory"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_destination_needs_no_reclaim() {
        let tmp = TempDir::new().unwrap();
        let called = std::cell::Cell::new(false);
        clear_collision(&tmp.path().join("fresh"), |_| {
            called.set(true);
            DeletionOutcome::Deleted
        })
        .unwrap();
        assert!(!called.get());
    }
}
