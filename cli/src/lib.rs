use std::error::Error as _;
use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use docs_snippets::ErrorPolicy;
use docs_snippets::ExtractReport;
use docs_snippets::ExtractedSnippet;
use docs_snippets::SnippetConfig;
use docs_snippets::SnippetExtractor;
use owo_colors::OwoColorize;
use tracing::debug;

/// Extract the `pipelines` section of pipeline definitions into
/// documentation snippets.
#[derive(Debug, Parser)]
#[command(name = "extract-snippets", version)]
pub struct Cli {
    /// Files to extract. When omitted, every file in the input directory
    /// matching the pattern is extracted.
    pub files: Vec<PathBuf>,

    /// YAML config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory that relative paths resolve against. Defaults to the
    /// current directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory holding the pipeline definitions.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory the snippets are written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name pattern, e.g. `*.yaml`.
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Top-level key to keep.
    #[arg(long)]
    pub key: Option<String>,

    /// Keep extracting after a file fails.
    #[arg(long)]
    pub keep_going: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file values overridden by command-line flags, with relative
    /// directories joined onto `root`.
    pub fn build_config(&self, root: &Path) -> Result<SnippetConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = root.join(path);
                SnippetConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => SnippetConfig::default(),
        };

        if let Some(input_dir) = &self.input_dir {
            config.input_dir = input_dir.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        if self.keep_going {
            config.on_error = ErrorPolicy::Continue;
        }

        Ok(config.resolve(root))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let config = cli.build_config(&root)?;
    debug!(?config, "resolved configuration");
    let extractor = config.extractor();

    let report = if cli.files.is_empty() {
        let pattern = config.file_pattern();
        debug!(pattern = pattern.as_str(), "scanning input directory");
        extractor
            .extract_all_with(
                &config.input_dir,
                &pattern,
                config.on_error,
                print_extracted,
            )
            .with_context(|| {
                format!(
                    "failed to extract snippets from {}",
                    config.input_dir.display()
                )
            })?
    } else {
        let files: Vec<PathBuf> = cli.files.iter().map(|file| root.join(file)).collect();
        extractor
            .extract_files_with(&files, config.on_error, print_extracted)
            .context("failed to extract snippets")?
    };

    print_summary(&report, &extractor);

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} files failed",
            report.failures.len(),
            report.failures.len() + report.count()
        );
    }
    Ok(())
}

fn print_extracted(snippet: &ExtractedSnippet) {
    println!(
        "extracted {} to {}",
        snippet.input.display(),
        snippet.output.display()
    );
}

fn print_summary(report: &ExtractReport, extractor: &SnippetExtractor) {
    for failure in &report.failures {
        let mut line = failure.to_string();
        let mut cause = failure.source();
        while let Some(err) = cause {
            let _ = write!(line, ": {err}");
            cause = err.source();
        }
        eprintln!("{} {line}", "failed:".red());
    }

    println!(
        "{} {} snippet(s) written to {} (key: {})",
        "done:".green(),
        report.count(),
        extractor.output_dir().display(),
        extractor.key()
    );
}
