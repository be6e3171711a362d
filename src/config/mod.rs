//! Configuration loading
//!
//! Precedence: environment > config file > defaults. Command-line flags are
//! applied on top by the CLI.

pub mod loader;

pub use loader::{apply_env, load_config, ENV_PREFIX};
