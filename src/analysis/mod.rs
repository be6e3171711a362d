//! Repository analysis that does not need the language model.

pub mod deps;

pub use deps::{parse_requirements, scan_dependencies, DependencyScan};
