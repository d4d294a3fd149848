use crate::document::PIPELINES_KEY;
use crate::document::has_content;
use crate::error::SnippetError;
use crate::error::SnippetResult;
use crate::extractor::ErrorPolicy;
use crate::extractor::SnippetExtractor;
use crate::pattern::DEFAULT_PATTERN;
use crate::pattern::FilePattern;
use serde::Deserialize;
use serde::Serialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

pub const DEFAULT_INPUT_DIR: &str = "ksml/src/test/resources/pipelines";
pub const DEFAULT_OUTPUT_DIR: &str = "docs/_snippets";

/// Settings for a snippet extraction run.
///
/// Relative directories are not tied to the process working directory; call
/// [`SnippetConfig::resolve`] with an explicit root before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pattern: String,
    pub key: String,
    pub on_error: ErrorPolicy,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            key: PIPELINES_KEY.to_string(),
            on_error: ErrorPolicy::default(),
        }
    }
}

impl SnippetConfig {
    /// Load a YAML config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> SnippetResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| SnippetError::io(path, err))?;
        Self::from_yaml(&contents, path)
    }

    fn from_yaml(contents: &str, path: &Path) -> SnippetResult<Self> {
        let config_error = |source| SnippetError::Config {
            path: path.to_path_buf(),
            source,
        };

        if !has_content(contents) {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(contents).map_err(config_error)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(config_error)
    }

    /// Join relative directories onto `root`. Absolute ones are kept.
    pub fn resolve(&self, root: &Path) -> Self {
        Self {
            input_dir: root.join(&self.input_dir),
            output_dir: root.join(&self.output_dir),
            ..self.clone()
        }
    }

    pub fn file_pattern(&self) -> FilePattern {
        FilePattern::new(self.pattern.clone())
    }

    pub fn extractor(&self) -> SnippetExtractor {
        SnippetExtractor::new(self.output_dir.clone()).with_key(self.key.clone())
    }
}
