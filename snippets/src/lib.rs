//! Extract the `pipelines` section of pipeline definition files into
//! standalone YAML snippets for the documentation.

mod config;
mod document;
mod error;
mod extractor;
mod pattern;

pub use config::DEFAULT_INPUT_DIR;
pub use config::DEFAULT_OUTPUT_DIR;
pub use config::SnippetConfig;
pub use document::PIPELINES_KEY;
pub use document::PipelineDocument;
pub use document::Snippet;
pub use error::SnippetError;
pub use error::SnippetResult;
pub use extractor::ErrorPolicy;
pub use extractor::ExtractReport;
pub use extractor::ExtractedSnippet;
pub use extractor::SnippetExtractor;
pub use extractor::matching_files;
pub use pattern::DEFAULT_PATTERN;
pub use pattern::FilePattern;

use std::path::Path;
use std::path::PathBuf;

/// Write the `pipelines` snippet of `input` into `output_dir`.
pub fn extract(input: &Path, output_dir: &Path) -> SnippetResult<PathBuf> {
    SnippetExtractor::new(output_dir).extract(input)
}

/// Extract every file in `input_dir` matching `pattern`, stopping at the first
/// failure. Returns the number of snippets written.
pub fn extract_all(input_dir: &Path, output_dir: &Path, pattern: &str) -> SnippetResult<usize> {
    let report = SnippetExtractor::new(output_dir).extract_all(
        input_dir,
        &FilePattern::new(pattern),
        ErrorPolicy::FailFast,
    )?;
    Ok(report.count())
}
