//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory under which workspaces are created. `None` means the OS temp dir.
    pub temp_root: Option<PathBuf>,
    pub workspace_prefix: String,
    pub default_branch: String,
    /// Hosts that accept a token embedded in the clone URL.
    pub token_hosts: Vec<String>,
    pub file_summary_max_chars: usize,
    pub reclaim: ReclaimConfig,
    pub context: ContextLimits,
    pub gateway: GatewayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_root: None,
            workspace_prefix: "repo-ask".to_string(),
            default_branch: "master".to_string(),
            token_hosts: vec!["github.com".to_string()],
            file_summary_max_chars: 15_000,
            reclaim: ReclaimConfig::default(),
            context: ContextLimits::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    pub fn resolved_temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReclaimConfig {
    pub max_retries: u32,
    pub delay_ms: u64,
}

impl Default for ReclaimConfig {
    fn default() -> Self {
        Self { max_retries: 3, delay_ms: 500 }
    }
}

impl ReclaimConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Caps applied by the context builder. All lengths are in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    pub explicit_excerpt_chars: usize,
    pub readme_excerpt_chars: usize,
    pub source_excerpt_chars: usize,
    pub max_additional_files: usize,
    /// The path listing is appended only when the index is smaller than this.
    pub listing_threshold: usize,
    pub listing_max_paths: usize,
    /// Ceiling for the rendered text; explicit files are admitted regardless.
    pub max_total_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            explicit_excerpt_chars: 5_000,
            readme_excerpt_chars: 3_000,
            source_excerpt_chars: 2_500,
            max_additional_files: 10,
            listing_threshold: 200,
            listing_max_paths: 75,
            max_total_chars: 80_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}
