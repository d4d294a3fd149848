use std::fmt;
use std::path::Path;
use wildmatch::WildMatch;

pub const DEFAULT_PATTERN: &str = "*.yaml";

/// Shell-style wildcard (`*`, `?`) matched against a file name.
#[derive(Debug, Clone)]
pub struct FilePattern {
    raw: String,
    matcher: WildMatch,
}

impl FilePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let matcher = WildMatch::new(&raw);
        Self { raw, matcher }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.matches(file_name)
    }

    /// Match the last component of `path`. Paths without a UTF-8 file name
    /// never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.matches(name))
    }
}

impl Default for FilePattern {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
