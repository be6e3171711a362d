//! Utility helpers

pub mod encoding;
pub mod paths;
pub mod text;

pub use encoding::{decode_bytes, looks_binary, read_text_file};
pub use paths::{normalize_path, normalize_relative, resolve_existing_under, resolve_under};
pub use text::{longest_backtick_run, truncate_chars};
