//! Text rendering for context bundles.

use crate::domain::{Section, SectionKind};
use crate::utils::longest_backtick_run;

pub const HEADER: &str = "Repository Context:\n";

pub fn render_section(section: &Section) -> String {
    if section.kind == SectionKind::Unreadable {
        return format!("\n--- File: {} (Could not be read or found) ---\n", section.path);
    }
    let fence = "`".repeat(longest_backtick_run(&section.excerpt).max(2) + 1);
    format!("\n--- File: {} ---\n{fence}\n{}\n{fence}\n", section.path, section.excerpt)
}

pub fn render_listing(paths: &[String]) -> String {
    let mut out = String::from("\n--- Repository File Structure (Partial) ---\n");
    out.push_str(&paths.join("\n"));
    out.push_str("\n(... and possibly more files)\n");
    out
}
