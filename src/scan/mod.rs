//! Workspace structure and content access

pub mod content;
pub mod index;

pub use content::read_text;
pub use index::{index_tree, VCS_DIR};
