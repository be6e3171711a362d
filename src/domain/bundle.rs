//! Assembled prompt context.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Explicit,
    Readme,
    Manifest,
    Source,
    /// Explicitly requested file that could not be read.
    Unreadable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub path: String,
    pub kind: SectionKind,
    pub excerpt: String,
    /// The excerpt is a strict prefix of the file content.
    pub truncated: bool,
}

/// Ordered, size-bounded context handed to the analysis gateway.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContextBundle {
    pub sections: Vec<Section>,
    pub listing: Vec<String>,
    pub text: String,
    /// The overall character ceiling stopped admission of further sections.
    pub truncated: bool,
}

impl ContextBundle {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.path.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.sections.iter().any(|s| s.path == path)
    }

    pub fn section(&self, path: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.path == path)
    }

    pub fn count_of(&self, kind: SectionKind) -> usize {
        self.sections.iter().filter(|s| s.kind == kind).count()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
