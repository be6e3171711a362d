//! Text renderers for bundles and indexes.

pub mod context;
pub mod tree;

pub use context::{render_listing, render_section, HEADER};
pub use tree::render_tree;
