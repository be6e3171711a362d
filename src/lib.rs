//! repo-ask: clone a remote repository into a throwaway workspace, assemble
//! a bounded context from it, and ask a language model about it.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod utils;

pub use domain::{Config, ContextBundle, RepoTarget, Workspace};
pub use error::{CloneCause, PipelineError};
pub use pipeline::Pipeline;
