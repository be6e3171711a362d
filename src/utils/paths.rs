//! Path normalization

use std::path::{Component, Path, PathBuf};

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Normalize a caller-supplied relative path: `/` separators, no leading `./`,
/// no trailing or doubled separators.
pub fn normalize_relative(path: &str) -> String {
    normalize_path(path.trim())
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join `relative` onto `root`, refusing absolute paths and anything that
/// would climb out of `root`.
pub fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let normalized = normalize_relative(relative);
    if normalized.is_empty() {
        return None;
    }
    let rel = Path::new(&normalized);
    if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(root.join(rel))
}

/// Like [`resolve_under`], but for an existing path whose real location,
/// after following symlinks, must still lie inside `root`.
pub fn resolve_existing_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let joined = resolve_under(root, relative)?;
    let real_root = root.canonicalize().ok()?;
    let real = joined.canonicalize().ok()?;
    real.starts_with(&real_root).then_some(real)
}
