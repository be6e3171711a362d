//! Single-file text access inside a workspace.

use crate::utils::{read_text_file, resolve_existing_under};
use std::path::Path;

/// Text content of `relative` under `root`, or `None`.
///
/// `None` covers every way a file can be unusable as prompt text: a path
/// escaping the root (textually or through a symlink), a missing path, a
/// non-file, a read failure, or binary content. Undecodable bytes inside otherwise textual files are replaced.
pub fn read_text(root: &Path, relative: &str) -> Option<String> {
    let Some(path) = resolve_existing_under(root, relative) else {
        tracing::debug!("Missing or outside the workspace: {}", relative);
        return None;
    };
    if !path.is_file() {
        tracing::debug!("Not found or not a file: {}", path.display());
        return None;
    }
    match read_text_file(&path) {
        Ok(Some(text)) => Some(text),
        Ok(None) => {
            tracing::debug!("Skipping binary file: {}", path.display());
            None
        }
        Err(err) => {
            tracing::debug!("{:#}", err);
            None
        }
    }
}
