//! Request-level operations: fetch, analyze, reclaim.

use crate::analysis::scan_dependencies;
use crate::context::policy::README_CANDIDATES;
use crate::context::ContextBuilder;
use crate::domain::{
    Config, ContextBundle, DependencyReport, FileSummary, QueryAnswer, RepoInfo, RepoTarget,
    Workspace,
};
use crate::error::PipelineError;
use crate::fetch::{RepositorySource, WorkspaceGuard};
use crate::gateway::{prompts, AnalysisGateway};
use crate::scan::{index_tree, read_text};
use crate::utils::{normalize_relative, truncate_chars};

const STRUCTURE_SAMPLE: usize = 50;
const NO_README: &str = "No README file found.";
const NO_DEPENDENCIES: &str = "No supported dependency files (like package.json, \
requirements.txt, etc.) were found in the root directory or common subdirectories.";

pub struct Pipeline {
    source: RepositorySource,
    builder: ContextBuilder,
    file_summary_max_chars: usize,
}

impl Pipeline {
    pub fn new(source: RepositorySource, builder: ContextBuilder) -> Self {
        Self { source, builder, file_summary_max_chars: Config::default().file_summary_max_chars }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            source: RepositorySource::from_config(config),
            builder: ContextBuilder::new(config.context.clone()),
            file_summary_max_chars: config.file_summary_max_chars,
        }
    }

    pub fn file_summary_max_chars(mut self, max_chars: usize) -> Self {
        self.file_summary_max_chars = max_chars;
        self
    }

    /// Fetch `target`, run `body` against the checkout, then reclaim it.
    ///
    /// The checkout is reclaimed on every exit path, including unwinding.
    pub fn with_workspace<T>(
        &self,
        target: &RepoTarget,
        body: impl FnOnce(&Workspace) -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        let workspace =
            self.source.fetch(&target.url, &target.branch, target.credential.as_deref())?;
        let guard = WorkspaceGuard::new(workspace, self.source.reclaimer().clone());
        body(guard.workspace())
    }

    pub fn assemble_context(
        &self,
        target: &RepoTarget,
        explicit_files: &[String],
        query_hint: Option<&str>,
    ) -> Result<ContextBundle, PipelineError> {
        self.with_workspace(target, |ws| Ok(self.builder.build(ws, explicit_files, query_hint)))
    }

    pub fn describe(
        &self,
        target: &RepoTarget,
        gateway: &dyn AnalysisGateway,
    ) -> Result<RepoInfo, PipelineError> {
        self.with_workspace(target, |ws| {
            let structure = index_tree(&ws.root);
            let sample: Vec<&str> = structure.paths().take(STRUCTURE_SAMPLE).collect();
            let sample = serde_json::to_string_pretty(&sample).map_err(anyhow::Error::from)?;

            let readme = README_CANDIDATES
                .iter()
                .find_map(|name| read_text(&ws.root, name))
                .map(|text| {
                    truncate_chars(&text, self.builder.limits().readme_excerpt_chars)
                        .0
                        .to_string()
                })
                .unwrap_or_else(|| NO_README.to_string());

            let summary = complete(
                gateway,
                &prompts::repo_summary(&sample, &readme),
                "Failed to generate repository summary",
            )?;
            Ok(RepoInfo {
                repo_url: ws.repo_url.clone(),
                branch: ws.branch.clone(),
                summary,
                structure,
            })
        })
    }

    pub fn query(
        &self,
        target: &RepoTarget,
        question: &str,
        explicit_files: &[String],
        gateway: &dyn AnalysisGateway,
    ) -> Result<QueryAnswer, PipelineError> {
        self.with_workspace(target, |ws| {
            let bundle = self.builder.build(ws, explicit_files, Some(question));
            let response = complete(
                gateway,
                &prompts::repo_question(&bundle.text, question),
                "Failed to generate answer",
            )?;
            Ok(QueryAnswer {
                query: question.to_string(),
                response,
                repo_url: ws.repo_url.clone(),
                branch: ws.branch.clone(),
            })
        })
    }

    pub fn summarize_file(
        &self,
        target: &RepoTarget,
        path: &str,
        gateway: &dyn AnalysisGateway,
    ) -> Result<FileSummary, PipelineError> {
        let file_path = normalize_relative(path);
        self.with_workspace(target, |ws| {
            let content = read_text(&ws.root, &file_path)
                .ok_or_else(|| PipelineError::FileUnavailable { path: file_path.clone() })?;
            let (content, truncated) = truncate_chars(&content, self.file_summary_max_chars);
            let summary = complete(
                gateway,
                &prompts::file_summary(&file_path, content, truncated),
                "Failed to generate file summary",
            )?;
            Ok(FileSummary {
                repo_url: ws.repo_url.clone(),
                branch: ws.branch.clone(),
                file_path: file_path.clone(),
                summary,
            })
        })
    }

    pub fn analyze_dependencies(
        &self,
        target: &RepoTarget,
        gateway: &dyn AnalysisGateway,
    ) -> Result<DependencyReport, PipelineError> {
        self.with_workspace(target, |ws| {
            let scan = scan_dependencies(&ws.root);
            let explanation = if scan.is_empty() {
                NO_DEPENDENCIES.to_string()
            } else {
                complete(
                    gateway,
                    &prompts::dependency_explanation(&scan.render()),
                    "Failed to generate dependency explanation",
                )?
            };
            Ok(DependencyReport {
                repo_url: ws.repo_url.clone(),
                branch: ws.branch.clone(),
                dependencies: scan.dependencies,
                explanation,
            })
        })
    }
}

fn complete(
    gateway: &dyn AnalysisGateway,
    prompt: &str,
    context: &str,
) -> Result<String, PipelineError> {
    tracing::debug!("Sending {} chars to {}", prompt.chars().count(), gateway.name());
    gateway
        .complete(prompt)
        .map(|completion| completion.into_text())
        .map_err(|source| PipelineError::Gateway { context: context.to_string(), source })
}
