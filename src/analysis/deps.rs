//! Declared-dependency extraction from well-known manifests.

use crate::scan::read_text;
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

static REQUIREMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z0-9_.\-]+)\s*([<>=!~]+.*)?").unwrap());

const REQUIREMENTS_FILES: &[&str] =
    &["requirements.txt", "requirements/base.txt", "requirements/dev.txt"];

/// Manifests whose presence is reported without parsing.
const DETECT_ONLY: &[(&str, &str)] = &[
    ("pom.xml", "java_maven"),
    ("build.gradle", "java_gradle"),
    ("build.gradle.kts", "java_gradle_kotlin"),
    ("go.mod", "go_modules"),
    ("composer.json", "php_composer"),
    ("Gemfile", "ruby_bundler"),
];

const PARSED_EXCERPT_CHARS: usize = 2_000;
const DETECTED_EXCERPT_CHARS: usize = 1_500;

#[derive(Debug, Default)]
pub struct DependencyScan {
    pub dependencies: BTreeMap<String, Value>,
    /// Manifest name and leading content, in scan order.
    pub excerpts: Vec<(String, String)>,
}

impl DependencyScan {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    fn excerpt(&mut self, name: &str, content: &str, max_chars: usize) {
        let (prefix, _) = truncate_chars(content, max_chars);
        self.excerpts.push((name.to_string(), prefix.to_string()));
    }

    /// Text block handed to the dependency explanation prompt.
    pub fn render(&self) -> String {
        let deps = serde_json::to_string_pretty(&self.dependencies).unwrap_or_default();
        let mut out = format!("Detected Dependencies:\n{deps}\n\n");
        if !self.excerpts.is_empty() {
            out.push_str("Relevant File Contents (Partial):\n");
            for (name, content) in &self.excerpts {
                out.push_str(&format!("--- {name} ---\n{content}\n\n"));
            }
        }
        out
    }
}

pub fn scan_dependencies(root: &Path) -> DependencyScan {
    let mut scan = DependencyScan::default();

    if let Some(content) = read_text(root, "package.json") {
        scan_package_json(&mut scan, &content);
    }

    for name in REQUIREMENTS_FILES {
        let Some(content) = read_text(root, name) else {
            continue;
        };
        let reqs = parse_requirements(&content);
        if !reqs.is_empty() {
            scan.dependencies.insert(format!("python_{}", name.replace('/', "_")), Value::Object(reqs));
            scan.excerpt(name, &content, PARSED_EXCERPT_CHARS);
        }
    }

    if let Some(content) = read_text(root, "pyproject.toml") {
        if let Some(value) = parse_pyproject(&content) {
            scan.dependencies.insert("python_pyproject_toml".to_string(), value);
            scan.excerpt("pyproject.toml", &content, PARSED_EXCERPT_CHARS);
        }
    }

    if let Some(content) = read_text(root, "Cargo.toml").filter(|c| !c.is_empty()) {
        let value = parse_cargo_manifest(&content)
            .map(Value::Object)
            .unwrap_or_else(|| Value::String("Detected".to_string()));
        scan.dependencies.insert("rust_cargo".to_string(), value);
        scan.excerpt("Cargo.toml", &content, DETECTED_EXCERPT_CHARS);
    }

    for (name, key) in DETECT_ONLY {
        if let Some(content) = read_text(root, name).filter(|c| !c.is_empty()) {
            scan.dependencies.insert(key.to_string(), Value::String("Detected".to_string()));
            scan.excerpt(name, &content, DETECTED_EXCERPT_CHARS);
        }
    }

    scan
}

fn scan_package_json(scan: &mut DependencyScan, content: &str) {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("Failed to parse package.json: {}", err);
            scan.dependencies.insert("nodejs_parse_error".to_string(), Value::String(err.to_string()));
            return;
        }
    };
    let mut found = false;
    for (field, key) in [("dependencies", "nodejs_runtime"), ("devDependencies", "nodejs_development")]
    {
        if let Some(deps) = parsed.get(field).and_then(Value::as_object).filter(|d| !d.is_empty()) {
            scan.dependencies.insert(key.to_string(), Value::Object(deps.clone()));
            found = true;
        }
    }
    if found {
        scan.excerpt("package.json", content, PARSED_EXCERPT_CHARS);
    }
}

/// `name -> version spec` for each requirement line; `any` when unpinned.
pub fn parse_requirements(content: &str) -> Map<String, Value> {
    let mut reqs = Map::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        if let Some(caps) = REQUIREMENT_LINE.captures(line) {
            let version = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("any");
            reqs.insert(caps[1].to_string(), Value::String(version.to_string()));
        }
    }
    reqs
}

fn parse_pyproject(content: &str) -> Option<Value> {
    let Ok(doc) = toml::from_str::<toml::Value>(content) else {
        let marked = content.contains("[tool.poetry.dependencies]")
            || content.contains("[project.dependencies]");
        return marked.then(|| Value::String("Found (Poetry/PEP621 format)".to_string()));
    };

    let mut deps = Map::new();
    if let Some(list) = doc.get("project").and_then(|p| p.get("dependencies")).and_then(toml::Value::as_array) {
        let joined: String =
            list.iter().filter_map(toml::Value::as_str).collect::<Vec<_>>().join("\n");
        deps.extend(parse_requirements(&joined));
    }
    if let Some(table) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_table)
    {
        for (name, spec) in table {
            deps.insert(name.clone(), Value::String(describe_toml_spec(spec)));
        }
    }
    (!deps.is_empty()).then_some(Value::Object(deps))
}

fn parse_cargo_manifest(content: &str) -> Option<Map<String, Value>> {
    let doc = toml::from_str::<toml::Value>(content).ok()?;
    let mut deps = Map::new();
    for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
        let Some(table) = doc.get(section).and_then(toml::Value::as_table) else {
            continue;
        };
        let entries: Map<String, Value> = table
            .iter()
            .map(|(name, spec)| (name.clone(), Value::String(describe_toml_spec(spec))))
            .collect();
        if !entries.is_empty() {
            deps.insert(section.to_string(), Value::Object(entries));
        }
    }
    (!deps.is_empty()).then_some(deps)
}

fn describe_toml_spec(spec: &toml::Value) -> String {
    if let Some(version) = spec.as_str() {
        return version.to_string();
    }
    let Some(table) = spec.as_table() else {
        return "any".to_string();
    };
    if let Some(version) = table.get("version").and_then(toml::Value::as_str) {
        return version.to_string();
    }
    for source in ["path", "git", "workspace"] {
        if table.contains_key(source) {
            return source.to_string();
        }
    }
    "any".to_string()
}
