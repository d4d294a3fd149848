use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use docs_snippets::ErrorPolicy;
use docs_snippets::FilePattern;
use docs_snippets::PipelineDocument;
use docs_snippets::SnippetError;
use docs_snippets::SnippetExtractor;
use docs_snippets::extract;
use docs_snippets::extract_all;
use tempfile::tempdir;

const AGGREGATE_INLINE: &str = r#"streams:
  test_input:
    topic: input_topic
    keyType: string
    valueType: avro:SensorData
functions:
  aggregator:
    type: aggregator
    code: |
      return aggregatedValue
pipelines:
  - name: p1
    from: test_input
    steps:
      - type: groupByKey
      - type: aggregate
        aggregator: aggregator
    toTopic: output_topic
"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write input file");
}

fn read_doc(path: &Path) -> PipelineDocument {
    PipelineDocument::from_file(path).expect("read output document")
}

#[test]
fn aggregate_inline_drops_functions_and_streams() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "test-aggregate-inline.yaml", AGGREGATE_INLINE);

    let written = extract(
        &input.path().join("test-aggregate-inline.yaml"),
        output.path(),
    )
    .expect("extract");

    assert_eq!(written, output.path().join("test-aggregate-inline.yaml"));

    let source = read_doc(&input.path().join("test-aggregate-inline.yaml"));
    let snippet = read_doc(&written);
    let keys: Vec<_> = snippet.keys().filter_map(|key| key.as_str()).collect();
    assert_eq!(keys, vec!["pipelines"]);
    assert_eq!(snippet.get("pipelines"), source.get("pipelines"));
    assert!(snippet.get("functions").is_none());
}

#[test]
fn missing_pipelines_key_writes_null_snippet() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "streams-only.yaml", "streams:\n  a:\n    topic: a\n");

    let written = extract(&input.path().join("streams-only.yaml"), output.path()).expect("extract");

    assert_eq!(
        fs::read_to_string(written).expect("read snippet"),
        "pipelines: null\n"
    );
}

#[test]
fn extraction_is_idempotent() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "test-aggregate-inline.yaml", AGGREGATE_INLINE);
    let path = input.path().join("test-aggregate-inline.yaml");

    let first = extract(&path, output.path()).expect("first run");
    let first_bytes = fs::read(&first).expect("read first");
    let second = extract(&path, output.path()).expect("second run");
    let second_bytes = fs::read(&second).expect("read second");

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn output_directory_is_created() {
    let input = tempdir().expect("input dir");
    let root = tempdir().expect("root");
    let output = root.path().join("docs").join("_snippets");
    write(input.path(), "a.yaml", "pipelines: []\n");

    extract(&input.path().join("a.yaml"), &output).expect("extract");

    assert!(output.join("a.yaml").is_file());
}

#[test]
fn batch_writes_one_snippet_per_matching_file() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    for name in ["test-copying.yaml", "test-filtering.yaml", "test-branch.yaml"] {
        write(input.path(), name, "pipelines:\n  main:\n    from: in\n    to: out\n");
    }
    write(input.path(), "notes.txt", "not a pipeline");
    fs::create_dir(input.path().join("nested.yaml")).expect("nested dir");

    let count = extract_all(input.path(), output.path(), "*.yaml").expect("extract all");
    assert_eq!(count, 3);

    let mut written: Vec<String> = fs::read_dir(output.path())
        .expect("read output")
        .map(|entry| {
            entry
                .expect("entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec!["test-branch.yaml", "test-copying.yaml", "test-filtering.yaml"]
    );
}

#[test]
fn empty_input_directory_creates_output_only() {
    let input = tempdir().expect("input dir");
    let root = tempdir().expect("root");
    let output = root.path().join("_snippets");

    let count = extract_all(input.path(), &output, "*.yaml").expect("extract all");

    assert_eq!(count, 0);
    assert!(output.is_dir());
    assert_eq!(fs::read_dir(&output).expect("read output").count(), 0);
}

#[test]
fn missing_input_directory_is_an_io_error() {
    let root = tempdir().expect("root");
    let err = extract_all(&root.path().join("absent"), &root.path().join("out"), "*.yaml")
        .expect_err("missing dir");
    assert!(matches!(err, SnippetError::Io { .. }));
}

#[test]
fn fail_fast_stops_at_first_bad_file() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "a-good.yaml", "pipelines: [1]\n");
    write(input.path(), "b-bad.yaml", "pipelines: [unclosed\n");
    write(input.path(), "c-good.yaml", "pipelines: [3]\n");

    let err = SnippetExtractor::new(output.path())
        .extract_all(input.path(), &FilePattern::default(), ErrorPolicy::FailFast)
        .expect_err("bad file aborts the run");

    assert!(err.is_parse());
    assert_eq!(err.path(), input.path().join("b-bad.yaml"));
    assert!(output.path().join("a-good.yaml").is_file());
    assert!(!output.path().join("c-good.yaml").exists());
}

#[test]
fn continue_policy_reports_failures_and_keeps_going() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "a-good.yaml", "pipelines: [1]\n");
    write(input.path(), "b-list.yaml", "- not\n- a mapping\n");
    write(input.path(), "c-good.yaml", "pipelines: [3]\n");

    let report = SnippetExtractor::new(output.path())
        .extract_all(input.path(), &FilePattern::default(), ErrorPolicy::Continue)
        .expect("report");

    assert_eq!(report.count(), 2);
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0],
        SnippetError::NotAMapping { .. }
    ));
    assert!(output.path().join("c-good.yaml").is_file());
    assert!(!output.path().join("b-list.yaml").exists());
}

#[test]
fn custom_key_is_extracted() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "defs.yaml", AGGREGATE_INLINE);

    let written = SnippetExtractor::new(output.path())
        .with_key("functions")
        .extract(&input.path().join("defs.yaml"))
        .expect("extract");

    let snippet = read_doc(&written);
    assert!(snippet.get("functions").is_some());
    assert!(snippet.get("pipelines").is_none());
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    fs::write(input.path().join("a.yaml"), b"pipelines: \xff\xfe\n").expect("write bytes");

    let err = extract(&input.path().join("a.yaml"), output.path()).expect_err("undecodable input");

    assert!(err.is_parse());
    assert!(matches!(err, SnippetError::Encoding { .. }));
    assert_eq!(err.path(), input.path().join("a.yaml"));
    assert!(!output.path().join("a.yaml").exists());
}

#[test]
fn written_snippets_are_reported_before_a_later_failure() {
    let input = tempdir().expect("input dir");
    let output = tempdir().expect("output dir");
    write(input.path(), "a.yaml", "pipelines: [1]\n");
    write(input.path(), "b.yaml", "pipelines: [unclosed\n");

    let mut seen = Vec::new();
    let err = SnippetExtractor::new(output.path())
        .extract_all_with(
            input.path(),
            &FilePattern::new("*.yaml"),
            ErrorPolicy::FailFast,
            |snippet| seen.push(snippet.output.clone()),
        )
        .expect_err("bad file aborts the run");

    assert!(err.is_parse());
    assert_eq!(seen, vec![output.path().join("a.yaml")]);
}
