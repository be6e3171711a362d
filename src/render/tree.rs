//! ASCII tree view of an index.

use crate::domain::TreeIndex;
use std::collections::BTreeMap;

#[derive(Default)]
struct Node {
    dirs: BTreeMap<String, Node>,
    files: Vec<String>,
}

impl Node {
    fn insert(&mut self, path: &str) {
        let mut node = self;
        let mut parts = path.split('/').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                node.files.push(part.to_string());
            } else {
                node = node.dirs.entry(part.to_string()).or_default();
            }
        }
    }
}

/// Render `index` as a tree rooted at `root_label`, directories first.
///
/// Directories deeper than `max_depth` are shown collapsed.
pub fn render_tree(root_label: &str, index: &TreeIndex, max_depth: usize) -> String {
    let mut root = Node::default();
    for path in index.paths() {
        root.insert(path);
    }
    let mut lines = vec![format!("{root_label}/")];
    walk(&root, "", 1, max_depth, &mut lines);
    lines.join("\n")
}

fn walk(node: &Node, prefix: &str, depth: usize, max_depth: usize, lines: &mut Vec<String>) {
    let mut files: Vec<&String> = node.files.iter().collect();
    files.sort();
    let total = node.dirs.len() + files.len();

    for (idx, (name, child)) in node.dirs.iter().enumerate() {
        let is_last = idx + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        if depth >= max_depth {
            lines.push(format!("{prefix}{connector}{name}/ ..."));
            continue;
        }
        lines.push(format!("{prefix}{connector}{name}/"));
        let extension = if is_last { "    " } else { "│   " };
        walk(child, &format!("{prefix}{extension}"), depth + 1, max_depth, lines);
    }

    for (idx, name) in files.into_iter().enumerate() {
        let is_last = node.dirs.len() + idx + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}"));
    }
}
