//! Clone failure classification.
//!
//! Maps raw failure text from a clone backend onto [`CloneCause`]. The
//! classifier is a plain function pointer so a [`super::RepositorySource`]
//! can be built with a different one for other hosts or backends.

use crate::error::CloneCause;
use once_cell::sync::Lazy;
use regex::Regex;

pub type ClassifyFn = fn(&str) -> CloneCause;

static AUTH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)authentication (failed|required)").unwrap(),
        Regex::new(r"(?i)authentication replays").unwrap(),
        Regex::new(r"(?i)invalid (username|credentials|token)").unwrap(),
        Regex::new(r"(?i)\b(401|403)\b").unwrap(),
        Regex::new(r"(?i)code=auth\b").unwrap(),
    ]
});

static BRANCH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)could not find remote branch").unwrap(),
        Regex::new(r"(?i)remote branch \S+ not found").unwrap(),
        Regex::new(r"(?i)reference '?refs/(remotes/origin|heads)/[^']*'? not found").unwrap(),
    ]
});

static SHALLOW_UNSUPPORTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)shallow\b.*\b(not supported|unsupported)").unwrap());

/// Default classifier for git clone failures.
pub fn classify_clone_failure(raw: &str) -> CloneCause {
    if AUTH_PATTERNS.iter().any(|p| p.is_match(raw)) {
        return CloneCause::AuthenticationFailure;
    }
    if BRANCH_PATTERNS.iter().any(|p| p.is_match(raw)) {
        return CloneCause::BranchNotFound;
    }
    CloneCause::Unspecified
}

/// Whether the transport refused a depth-limited fetch.
pub fn is_shallow_unsupported(raw: &str) -> bool {
    SHALLOW_UNSUPPORTED.is_match(raw)
}

pub fn cause_hint(cause: CloneCause, branch: &str) -> String {
    match cause {
        CloneCause::AuthenticationFailure => {
            "Please check your access token and repository URL.".to_string()
        }
        CloneCause::BranchNotFound => format!("Please ensure the branch '{branch}' exists."),
        CloneCause::Unspecified => {
            "Check repository URL, branch name, and permissions.".to_string()
        }
    }
}
