use crate::error::SnippetError;
use crate::error::SnippetResult;
use serde_yaml::Mapping;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Top-level key kept in documentation snippets.
pub const PIPELINES_KEY: &str = "pipelines";

/// A parsed pipeline definition file.
///
/// The top level must be a mapping; everything below it is kept as an opaque
/// [`Value`] so that key order, tags and nesting survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDocument {
    path: PathBuf,
    root: Mapping,
}

/// A trimmed document holding a single top-level key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    key: String,
    value: Value,
}

impl PipelineDocument {
    pub fn from_file(path: &Path) -> SnippetResult<Self> {
        let bytes = fs::read(path).map_err(|err| SnippetError::io(path, err))?;
        let contents = std::str::from_utf8(&bytes).map_err(|source| SnippetError::Encoding {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(contents, path)
    }

    /// Parse `contents`, attributing any error to `path`.
    ///
    /// A file without any YAML document (empty, or only comments) is an empty
    /// mapping.
    pub fn parse(contents: &str, path: impl Into<PathBuf>) -> SnippetResult<Self> {
        let path = path.into();
        if !has_content(contents) {
            return Ok(Self {
                path,
                root: Mapping::new(),
            });
        }

        let value: Value = match serde_yaml::from_str(contents) {
            Ok(value) => value,
            Err(err) => return Err(SnippetError::parse(path, err)),
        };

        let root = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => return Err(SnippetError::NotAMapping { path }),
        };

        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.root.keys()
    }

    /// Keep only `key`. A missing key yields a `null` value rather than an
    /// error.
    pub fn snippet(&self, key: &str) -> Snippet {
        Snippet::new(key, self.get(key).cloned().unwrap_or(Value::Null))
    }

    pub fn into_snippet(mut self, key: &str) -> Snippet {
        let value = self.root.remove(key).unwrap_or(Value::Null);
        Snippet::new(key, value)
    }
}

impl Snippet {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_null()
    }

    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        mapping.insert(Value::String(self.key.clone()), self.value.clone());
        mapping
    }

    /// Render as YAML. Keys come out in insertion order.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_mapping())
    }
}

/// False when `contents` holds no YAML document: only blank lines or comments.
pub(crate) fn has_content(contents: &str) -> bool {
    contents.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    })
}
