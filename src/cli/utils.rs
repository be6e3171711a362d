//! Arguments and helpers shared by every subcommand.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::domain::{Config, RepoTarget};
use crate::error::PipelineError;
use crate::gateway::GeminiGateway;

#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository URL (https:// or file://)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Branch to clone [default: from config, "master"]
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Access token for private repositories
    #[arg(long, value_name = "TOKEN", env = "REPO_ASK_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl RepoArgs {
    pub fn target(&self, config: &Config) -> RepoTarget {
        let branch = self
            .branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(config.default_branch.as_str());
        RepoTarget::new(self.url.trim(), branch).with_credential(self.token.clone())
    }
}

/// Build the language model client before any clone is attempted.
pub fn gateway(config: &Config) -> Result<GeminiGateway, PipelineError> {
    GeminiGateway::from_config(&config.gateway).map_err(|source| PipelineError::Gateway {
        context: "Language model is not available".to_string(),
        source,
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
