//! Flat file index of a directory tree.

use crate::domain::TreeIndex;
use crate::utils::normalize_path;
use std::cmp::Ordering;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Version-control metadata directory, never indexed.
pub const VCS_DIR: &str = ".git";

/// Index every non-directory entry under `root`.
///
/// Traversal is depth-first; within a directory, files come before
/// subdirectories and names sort bytewise, so the order is stable across
/// platforms. A missing root yields an empty index.
pub fn index_tree(root: &Path) -> TreeIndex {
    let mut index = TreeIndex::new();
    if !root.is_dir() {
        return index;
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(files_first)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_vcs_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        index.insert(normalize_path(rel.to_string_lossy().as_ref()));
    }

    tracing::debug!("Indexed {} files under {}", index.len(), root.display());
    index
}

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == VCS_DIR
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
