//! Error taxonomy surfaced at the pipeline boundary.

use crate::gateway::GatewayError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a clone failed, as decided by the clone failure classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneCause {
    AuthenticationFailure,
    BranchNotFound,
    Unspecified,
}

impl fmt::Display for CloneCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CloneCause::AuthenticationFailure => "authentication-failure",
            CloneCause::BranchNotFound => "branch-not-found",
            CloneCause::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not determine repository name from URL: {url}")]
    InvalidUrl { url: String },

    #[error("Failed to prepare workspace: {0}")]
    Setup(String),

    #[error("{message}")]
    Clone {
        cause: CloneCause,
        message: String,
        /// Classifier input, credential redacted. Diagnostics only.
        raw: String,
    },

    #[error("File not found or could not be read: {path}")]
    FileUnavailable { path: String },

    #[error("{context}: {source}")]
    Gateway {
        context: String,
        #[source]
        source: GatewayError,
    },

    #[error("Unexpected failure: {0:#}")]
    Unspecified(#[from] anyhow::Error),
}

impl PipelineError {
    pub fn clone_cause(&self) -> Option<CloneCause> {
        match self {
            PipelineError::Clone { cause, .. } => Some(*cause),
            _ => None,
        }
    }

    /// Process exit status used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InvalidUrl { .. } => 2,
            PipelineError::Clone { .. } => 3,
            PipelineError::FileUnavailable { .. } => 4,
            PipelineError::Gateway { .. } => 5,
            PipelineError::Setup(_) | PipelineError::Unspecified(_) => 1,
        }
    }
}
