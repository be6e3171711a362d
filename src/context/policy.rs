//! Fixed selection lists used by the context builder.

/// README variants, first readable one wins.
pub const README_CANDIDATES: &[&str] =
    &["README.md", "readme.md", "README", "README.txt", "README.rst"];

/// Build manifests and common entry points, in inclusion order.
pub const PRIORITY_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
    "Cargo.toml",
    "setup.py",
    "main.py",
    "index.js",
    "app.py",
    "server.js",
];

pub const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".c", ".cpp", ".h", ".go", ".rs", ".php",
    ".html", ".css", ".scss", ".vue", ".rb",
];

pub fn is_source_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SOURCE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file("src/App.TSX"));
        assert!(is_source_file("lib/main.rs"));
        assert!(!is_source_file("docs/guide.md"));
        assert!(!is_source_file("Makefile"));
    }
}
