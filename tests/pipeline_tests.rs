//! End-to-end pipeline tests against local fixture repositories.

mod common;

use common::{entry_count, FixtureRepo};
use repo_ask::context::ContextBuilder;
use repo_ask::domain::{ContextLimits, RepoTarget, SectionKind};
use repo_ask::fetch::{GitBackend, RepositorySource, WorkspaceReclaimer};
use repo_ask::gateway::{AnalysisGateway, Completion, GatewayError};
use repo_ask::{CloneCause, Pipeline, PipelineError};
use std::cell::RefCell;
use std::time::Duration;
use tempfile::TempDir;

fn pipeline(temp_root: &TempDir) -> Pipeline {
    let source = RepositorySource::new(
        temp_root.path().to_path_buf(),
        WorkspaceReclaimer::new(3, Duration::from_millis(10)),
        Box::new(GitBackend),
    );
    Pipeline::new(source, ContextBuilder::new(ContextLimits::default()))
}

/// Records prompts and replays one fixed completion.
struct FakeGateway {
    reply: Completion,
    prompts: RefCell<Vec<String>>,
}

impl FakeGateway {
    fn new(reply: Completion) -> Self {
        Self { reply, prompts: RefCell::new(Vec::new()) }
    }
}

impl AnalysisGateway for FakeGateway {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn complete(&self, prompt: &str) -> Result<Completion, GatewayError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct DownGateway;

impl AnalysisGateway for DownGateway {
    fn name(&self) -> &'static str {
        "down"
    }

    fn complete(&self, _prompt: &str) -> Result<Completion, GatewayError> {
        Err(GatewayError::Status { status: 503, body: "unavailable".to_string() })
    }
}

#[test]
fn test_workspace_has_checkout_and_is_reclaimed() {
    let fixture = FixtureRepo::new("main", &[("README.md", "hi"), ("lib/util.js", "x")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");

    let seen = pipeline(&tmp)
        .with_workspace(&target, |ws| {
            assert!(ws.root.join(".git").is_dir());
            assert!(ws.root.join("lib/util.js").is_file());
            assert_eq!(ws.branch, "main");
            Ok(ws.root.clone())
        })
        .unwrap();

    assert!(!seen.exists());
    assert_eq!(entry_count(tmp.path()), 0);
}

#[test]
fn test_workspace_reclaimed_when_body_fails() {
    let fixture = FixtureRepo::new("main", &[("README.md", "hi")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");

    let err = pipeline(&tmp)
        .with_workspace(&target, |_ws| -> Result<(), PipelineError> {
            Err(PipelineError::FileUnavailable { path: "x".to_string() })
        })
        .unwrap_err();

    assert!(matches!(err, PipelineError::FileUnavailable { .. }));
    assert_eq!(entry_count(tmp.path()), 0);
}

#[test]
fn test_missing_branch_is_classified() {
    let fixture = FixtureRepo::new("main", &[("README.md", "hi")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "nope");

    let err = pipeline(&tmp).with_workspace(&target, |_ws| Ok(())).unwrap_err();
    assert_eq!(err.clone_cause(), Some(CloneCause::BranchNotFound));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(entry_count(tmp.path()), 0);
}

#[test]
fn test_assemble_context_orders_sections() {
    let fixture = FixtureRepo::new(
        "main",
        &[
            ("README.md", "# Demo"),
            ("package.json", "{\"name\":\"demo\"}"),
            ("src/app.py", "print(1)"),
            ("src/util.py", "def f(): pass"),
        ],
    );
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");

    let bundle = pipeline(&tmp)
        .assemble_context(&target, &["src/util.py".to_string()], Some("what is this?"))
        .unwrap();

    let order: Vec<&str> = bundle.paths().collect();
    assert_eq!(order, vec!["src/util.py", "README.md", "package.json", "src/app.py"]);
    assert_eq!(bundle.sections[0].kind, SectionKind::Explicit);
    assert_eq!(bundle.listing.len(), 4);
    assert_eq!(entry_count(tmp.path()), 0);
}

#[test]
fn test_query_sends_context_and_returns_blocked_explanation() {
    let fixture = FixtureRepo::new("main", &[("README.md", "# Demo readme")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");
    let gateway = FakeGateway::new(Completion::Blocked { reason: "SAFETY".to_string() });

    let answer = pipeline(&tmp).query(&target, "What is it?", &[], &gateway).unwrap();
    assert!(answer.response.contains("(Reason: SAFETY)"));
    assert_eq!(answer.query, "What is it?");

    let prompts = gateway.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("# Demo readme"));
    assert!(prompts[0].contains("What is it?"));
}

#[test]
fn test_describe_indexes_structure() {
    let fixture = FixtureRepo::new("main", &[("a.txt", "a"), ("docs/b.md", "b")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");
    let gateway = FakeGateway::new(Completion::Text("A small repo.".to_string()));

    let info = pipeline(&tmp).describe(&target, &gateway).unwrap();
    assert_eq!(info.summary, "A small repo.");
    assert_eq!(info.structure.paths().collect::<Vec<_>>(), vec!["a.txt", "docs/b.md"]);
    assert!(gateway.prompts.borrow()[0].contains("No README file found."));
}

#[test]
fn test_summarize_missing_file() {
    let fixture = FixtureRepo::new("main", &[("README.md", "hi")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");
    let gateway = FakeGateway::new(Completion::Empty);

    let err = pipeline(&tmp).summarize_file(&target, "src/missing.rs", &gateway).unwrap_err();
    assert!(matches!(err, PipelineError::FileUnavailable { ref path } if path == "src/missing.rs"));
    assert!(gateway.prompts.borrow().is_empty());
    assert_eq!(entry_count(tmp.path()), 0);
}

#[test]
fn test_summarize_truncates_long_files() {
    let long = "x".repeat(200);
    let fixture = FixtureRepo::new("main", &[("big.txt", long.as_str())]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");
    let gateway = FakeGateway::new(Completion::Empty);

    let summary = pipeline(&tmp)
        .file_summary_max_chars(50)
        .summarize_file(&target, "big.txt", &gateway)
        .unwrap();
    assert!(summary.summary.contains("empty response"));
    let prompt = &gateway.prompts.borrow()[0];
    assert!(prompt.contains(&"x".repeat(50)));
    assert!(!prompt.contains(&"x".repeat(51)));
    assert!(prompt.contains("(content truncated)"));
}

#[test]
fn test_dependencies_without_manifests_skip_gateway() {
    let fixture = FixtureRepo::new("main", &[("notes.txt", "nothing here")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");

    let report = pipeline(&tmp).analyze_dependencies(&target, &DownGateway).unwrap();
    assert!(report.dependencies.is_empty());
    assert!(report.explanation.starts_with("No supported dependency files"));
}

#[test]
fn test_gateway_failure_reclaims_workspace() {
    let fixture = FixtureRepo::new("main", &[("requirements.txt", "flask==3.0\n")]);
    let tmp = TempDir::new().unwrap();
    let target = RepoTarget::new(fixture.url(), "main");

    let err = pipeline(&tmp).analyze_dependencies(&target, &DownGateway).unwrap_err();
    assert_eq!(err.exit_code(), 5);
    assert!(err.to_string().starts_with("Failed to generate dependency explanation"));
    assert_eq!(entry_count(tmp.path()), 0);
}
