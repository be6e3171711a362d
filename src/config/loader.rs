//! Config file discovery, parsing, and environment overlay

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "REPO_ASK_";

const CANDIDATES: &[&str] = &["repo-ask.toml", ".repo-ask.toml", "repo-ask.yml", "repo-ask.yaml"];

/// Table name under which settings may be nested inside a shared file.
const NESTED_SECTION: &str = "repo-ask";

/// Defaults, then the config file, then `REPO_ASK_*` environment variables.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let file_config = load_file_config(search_dir, config_path)?;
    apply_env(file_config, ENV_PREFIX)
}

/// Overlay environment variables named `{prefix}{KEY}`; `__` separates
/// nested keys, e.g. `REPO_ASK_CONTEXT__MAX_TOTAL_CHARS`.
pub fn apply_env(base: Config, prefix: &str) -> Result<Config> {
    Figment::from(Serialized::defaults(base))
        .merge(Env::prefixed(prefix).split("__"))
        .extract::<Config>()
        .context("Invalid configuration in environment variables")
}

pub fn load_file_config(search_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let Some(config_file) = config_path.map(Path::to_path_buf).or_else(|| discover_config(search_dir))
    else {
        return Ok(Config::default());
    };

    match parse_config_file(&config_file) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(config)
        }
        Err(err) if explicit => Err(err),
        Err(err) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                err
            );
            Ok(Config::default())
        }
    }
}

fn parse_config_file(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => {
            let raw: toml::Value = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;
            let value = raw.get(NESTED_SECTION).cloned().unwrap_or(raw);
            value
                .try_into()
                .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
        }
        "yaml" | "yml" => {
            let raw: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;
            let value = raw.get(NESTED_SECTION).cloned().unwrap_or(raw);
            serde_yaml::from_value(value)
                .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
        }
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| search_dir.join(name)).find(|path| path.is_file())
}
