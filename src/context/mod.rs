//! Bounded prompt context assembly

pub mod builder;
pub mod policy;

pub use builder::ContextBuilder;
