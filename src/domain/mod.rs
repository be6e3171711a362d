//! Core data types shared across the pipeline.

pub mod bundle;
pub mod config;
pub mod index;
pub mod reports;
pub mod workspace;

pub use bundle::{ContextBundle, Section, SectionKind};
pub use config::{Config, ContextLimits, GatewayConfig, ReclaimConfig};
pub use index::{EntryKind, FileEntry, TreeIndex};
pub use reports::{DependencyReport, FileSummary, QueryAnswer, RepoInfo};
pub use workspace::{DeletionOutcome, RepoTarget, Workspace};
