//! Deterministic, single-pass context selection.
//!
//! Inclusion order:
//! 1. explicitly requested files (unreadable ones become placeholders)
//! 2. the first README variant
//! 3. root-level manifests and entry points
//! 4. other source files in index order, up to a count cap
//! 5. a flat path listing for small repositories
//!
//! Every step skips paths that are already in the bundle. Steps 2-5 are also
//! subject to the overall character ceiling; explicit files are not.

use super::policy::{is_source_file, PRIORITY_FILES, README_CANDIDATES};
use crate::domain::{ContextBundle, ContextLimits, Section, SectionKind, TreeIndex, Workspace};
use crate::render::context::{render_listing, render_section, HEADER};
use crate::scan::{index_tree, read_text};
use crate::utils::{normalize_relative, truncate_chars};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    limits: ContextLimits,
}

impl ContextBuilder {
    pub fn new(limits: ContextLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ContextLimits {
        &self.limits
    }

    /// Index the workspace and build its bundle.
    pub fn build(
        &self,
        workspace: &Workspace,
        explicit_files: &[String],
        query_hint: Option<&str>,
    ) -> ContextBundle {
        let index = index_tree(&workspace.root);
        self.build_with_index(&workspace.root, &index, explicit_files, query_hint)
    }

    pub fn build_with_index(
        &self,
        root: &Path,
        index: &TreeIndex,
        explicit_files: &[String],
        query_hint: Option<&str>,
    ) -> ContextBundle {
        if let Some(hint) = query_hint {
            // Selection is positional; the hint does not influence it.
            tracing::debug!("Building context for query: {}", hint);
        }
        let limits = &self.limits;
        let mut acc = Accumulator::new(limits.max_total_chars);

        for requested in explicit_files {
            let path = normalize_relative(requested);
            if path.is_empty() || acc.contains(&path) {
                continue;
            }
            let section = match read_text(root, &path).filter(|t| !t.is_empty()) {
                Some(text) => {
                    excerpt(path, SectionKind::Explicit, &text, limits.explicit_excerpt_chars)
                }
                None => Section {
                    path,
                    kind: SectionKind::Unreadable,
                    excerpt: String::new(),
                    truncated: false,
                },
            };
            acc.force(section);
        }

        if !README_CANDIDATES.iter().any(|name| acc.contains(name)) {
            let readme = README_CANDIDATES
                .iter()
                .find_map(|name| read_text(root, name).map(|text| (*name, text)));
            if let Some((name, text)) = readme {
                acc.admit(excerpt(
                    name.to_string(),
                    SectionKind::Readme,
                    &text,
                    limits.readme_excerpt_chars,
                ));
            }
        }

        for name in PRIORITY_FILES {
            if acc.closed {
                break;
            }
            if !index.contains(name) || acc.contains(name) {
                continue;
            }
            if let Some(text) = read_text(root, name).filter(|t| !t.is_empty()) {
                acc.admit(excerpt(
                    name.to_string(),
                    SectionKind::Manifest,
                    &text,
                    limits.source_excerpt_chars,
                ));
            }
        }

        let mut added = 0usize;
        for path in index.paths() {
            if added >= limits.max_additional_files || acc.closed {
                break;
            }
            if acc.contains(path) || !is_source_file(path) {
                continue;
            }
            let Some(text) = read_text(root, path).filter(|t| !t.is_empty()) else {
                continue;
            };
            let section =
                excerpt(path.to_string(), SectionKind::Source, &text, limits.source_excerpt_chars);
            if acc.admit(section) {
                added += 1;
            }
        }

        if index.len() < limits.listing_threshold && !index.is_empty() {
            let listing: Vec<String> =
                index.paths().take(limits.listing_max_paths).map(str::to_string).collect();
            acc.admit_listing(listing);
        }

        let bundle = acc.finish();
        tracing::debug!(
            "Assembled context: {} sections, {} chars{}",
            bundle.sections.len(),
            bundle.char_len(),
            if bundle.truncated { " (ceiling reached)" } else { "" }
        );
        bundle
    }
}

fn excerpt(path: String, kind: SectionKind, text: &str, max_chars: usize) -> Section {
    let (prefix, truncated) = truncate_chars(text, max_chars);
    Section { path, kind, excerpt: prefix.to_string(), truncated }
}

/// Running bundle state: included paths, rendered text, ceiling bookkeeping.
struct Accumulator {
    sections: Vec<Section>,
    listing: Vec<String>,
    seen: HashSet<String>,
    text: String,
    chars: usize,
    ceiling: usize,
    /// Set once a section failed to fit; nothing else is admitted.
    closed: bool,
}

impl Accumulator {
    fn new(ceiling: usize) -> Self {
        Self {
            sections: Vec::new(),
            listing: Vec::new(),
            seen: HashSet::new(),
            text: HEADER.to_string(),
            chars: HEADER.chars().count(),
            ceiling,
            closed: false,
        }
    }

    fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    fn force(&mut self, section: Section) {
        let rendered = render_section(&section);
        self.push_text(&rendered);
        self.seen.insert(section.path.clone());
        self.sections.push(section);
    }

    fn admit(&mut self, section: Section) -> bool {
        if self.closed {
            return false;
        }
        let rendered = render_section(&section);
        if !self.fits(&rendered) {
            self.closed = true;
            return false;
        }
        self.push_text(&rendered);
        self.seen.insert(section.path.clone());
        self.sections.push(section);
        true
    }

    fn admit_listing(&mut self, listing: Vec<String>) {
        if self.closed {
            return;
        }
        let rendered = render_listing(&listing);
        if !self.fits(&rendered) {
            self.closed = true;
            return;
        }
        self.push_text(&rendered);
        self.listing = listing;
    }

    fn fits(&self, rendered: &str) -> bool {
        self.chars + rendered.chars().count() <= self.ceiling
    }

    fn push_text(&mut self, rendered: &str) {
        self.chars += rendered.chars().count();
        self.text.push_str(rendered);
    }

    fn finish(self) -> ContextBundle {
        ContextBundle {
            sections: self.sections,
            listing: self.listing,
            text: self.text,
            truncated: self.closed,
        }
    }
}
