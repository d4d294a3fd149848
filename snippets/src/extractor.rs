use crate::document::PIPELINES_KEY;
use crate::document::PipelineDocument;
use crate::error::SnippetError;
use crate::error::SnippetResult;
use crate::pattern::FilePattern;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// What a batch run does when one file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort on the first failure.
    #[default]
    FailFast,
    /// Record the failure and move on to the next file.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSnippet {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub extracted: Vec<ExtractedSnippet>,
    pub failures: Vec<SnippetError>,
}

impl ExtractReport {
    /// Number of snippet files written.
    pub fn count(&self) -> usize {
        self.extracted.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes trimmed copies of pipeline definitions into one output directory.
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    output_dir: PathBuf,
    key: String,
}

impl SnippetExtractor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            key: PIPELINES_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Output location for `input`: same file name, inside the output
    /// directory.
    pub fn output_path(&self, input: &Path) -> SnippetResult<PathBuf> {
        let name = input.file_name().ok_or_else(|| SnippetError::NoFileName {
            path: input.to_path_buf(),
        })?;
        Ok(self.output_dir.join(name))
    }

    /// Extract one file and return where the snippet was written. Existing
    /// output is overwritten.
    pub fn extract(&self, input: &Path) -> SnippetResult<PathBuf> {
        let output = self.output_path(input)?;

        let document = PipelineDocument::from_file(input)?;
        debug!(
            input = %document.path().display(),
            keys = document.keys().count(),
            "parsed pipeline definition"
        );
        let snippet = document.into_snippet(&self.key);
        if snippet.is_empty() {
            debug!(input = %input.display(), key = %self.key, "key absent, writing null snippet");
        }

        let yaml = snippet.to_yaml().map_err(|source| SnippetError::Serialize {
            path: input.to_path_buf(),
            source,
        })?;

        self.ensure_output_dir()?;
        fs::write(&output, yaml).map_err(|err| SnippetError::io(&output, err))?;

        info!(input = %input.display(), output = %output.display(), "extracted snippet");
        Ok(output)
    }

    /// Extract every file directly inside `input_dir` whose name matches
    /// `pattern`. The output directory is created even when nothing matches.
    pub fn extract_all(
        &self,
        input_dir: &Path,
        pattern: &FilePattern,
        policy: ErrorPolicy,
    ) -> SnippetResult<ExtractReport> {
        self.extract_all_with(input_dir, pattern, policy, |_| {})
    }

    /// Like [`SnippetExtractor::extract_all`], calling `on_extracted` as soon
    /// as each snippet is written, before any later file can abort the run.
    pub fn extract_all_with(
        &self,
        input_dir: &Path,
        pattern: &FilePattern,
        policy: ErrorPolicy,
        on_extracted: impl FnMut(&ExtractedSnippet),
    ) -> SnippetResult<ExtractReport> {
        self.ensure_output_dir()?;
        let inputs = matching_files(input_dir, pattern)?;
        debug!(
            dir = %input_dir.display(),
            pattern = pattern.as_str(),
            matched = inputs.len(),
            "discovered pipeline definitions"
        );
        self.extract_files_with(&inputs, policy, on_extracted)
    }

    /// Extract an explicit list of files in the order given.
    pub fn extract_files(
        &self,
        inputs: &[PathBuf],
        policy: ErrorPolicy,
    ) -> SnippetResult<ExtractReport> {
        self.extract_files_with(inputs, policy, |_| {})
    }

    pub fn extract_files_with(
        &self,
        inputs: &[PathBuf],
        policy: ErrorPolicy,
        mut on_extracted: impl FnMut(&ExtractedSnippet),
    ) -> SnippetResult<ExtractReport> {
        let mut report = ExtractReport::default();

        for input in inputs {
            match self.extract(input) {
                Ok(output) => {
                    let extracted = ExtractedSnippet {
                        input: input.clone(),
                        output,
                    };
                    on_extracted(&extracted);
                    report.extracted.push(extracted);
                }
                Err(err) => match policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::Continue => {
                        warn!(input = %input.display(), "skipping: {err}");
                        report.failures.push(err);
                    }
                },
            }
        }

        Ok(report)
    }

    fn ensure_output_dir(&self) -> SnippetResult<()> {
        fs::create_dir_all(&self.output_dir).map_err(|err| SnippetError::io(&self.output_dir, err))
    }
}

/// Regular files directly inside `dir` whose name matches `pattern`, sorted by
/// path.
pub fn matching_files(dir: &Path, pattern: &FilePattern) -> SnippetResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| SnippetError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SnippetError::io(dir, err))?;
        let path = entry.path();
        if path.is_file() && pattern.matches_path(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
