//! Results returned by pipeline operations.

use super::TreeIndex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct RepoInfo {
    pub repo_url: String,
    pub branch: String,
    pub summary: String,
    pub structure: TreeIndex,
}

#[derive(Debug, Serialize)]
pub struct QueryAnswer {
    pub query: String,
    pub response: String,
    pub repo_url: String,
    pub branch: String,
}

#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub repo_url: String,
    pub branch: String,
    pub file_path: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct DependencyReport {
    pub repo_url: String,
    pub branch: String,
    /// Ecosystem key (e.g. `nodejs_runtime`, `rust_cargo`) to parsed data.
    pub dependencies: BTreeMap<String, JsonValue>,
    pub explanation: String,
}
