//! Flat file index of a workspace.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
}

/// Descriptor stored for every indexed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
}

/// Insertion-ordered mapping of relative path to [`FileEntry`].
///
/// Keys are `/`-separated and unique; inserting an existing key is a no-op.
/// Serializes as a JSON object keyed by path.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    entries: Vec<FileEntry>,
    positions: HashMap<String, usize>,
}

impl TreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the path was already present.
    pub fn insert(&mut self, path: String) -> bool {
        if self.positions.contains_key(&path) {
            return false;
        }
        self.positions.insert(path.clone(), self.entries.len());
        self.entries.push(FileEntry { kind: EntryKind::File, path });
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.positions.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.positions.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths in index order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }
}

impl FromIterator<String> for TreeIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut index = TreeIndex::new();
        for path in iter {
            index.insert(path);
        }
        index
    }
}

impl Serialize for TreeIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.path, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_inserts_keep_first_position() {
        let mut index = TreeIndex::new();
        assert!(index.insert("b.rs".to_string()));
        assert!(index.insert("a.rs".to_string()));
        assert!(!index.insert("b.rs".to_string()));

        assert_eq!(index.len(), 2);
        assert_eq!(index.paths().collect::<Vec<_>>(), vec!["b.rs", "a.rs"]);
    }

    #[test]
    fn serializes_as_path_keyed_object() {
        let index: TreeIndex = vec!["src/app.py".to_string()].into_iter().collect();
        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["src/app.py"]["type"], "file");
        assert_eq!(value["src/app.py"]["path"], "src/app.py");
    }
}
