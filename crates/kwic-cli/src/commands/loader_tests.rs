use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use kwic_core::Corpus;

use super::corpus_loader::{is_json, load_corpus};
use super::error::CliError;
use super::pack::{PackArgs, pack};
use super::query_loader::load_query_source;

const CORPUS: &str = indoc! {r#"
    {
      "attributes": ["orth", "pos"],
      "granularity": 2,
      "documents": [
        {
          "meta": { "author": "aesop" },
          "tokens": [["the", "det"], ["fox", "noun"], ["runs", "verb"]],
          "subdocuments": { "s": [[0, 3]] }
        }
      ]
    }
"#};

#[test]
fn json_detected_by_extension() {
    assert!(is_json(&PathBuf::from("corpus.json")));
    assert!(is_json(&PathBuf::from("corpus.JSON")));
    assert!(!is_json(&PathBuf::from("corpus.kwc")));
    assert!(!is_json(&PathBuf::from("corpus")));
}

#[test]
fn load_json_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.json");
    fs::write(&path, CORPUS).unwrap();

    let corpus = load_corpus(Some(&path)).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.granularity(), Some(2));
}

#[test]
fn pack_then_load_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("corpus.json");
    let output = dir.path().join("corpus.kwc");
    fs::write(&input, CORPUS).unwrap();

    pack(&PackArgs {
        input: input.clone(),
        output: output.clone(),
    })
    .unwrap();

    let from_json = load_corpus(Some(&input)).unwrap();
    let from_snapshot = load_corpus(Some(&output)).unwrap();
    assert_eq!(from_snapshot.len(), from_json.len());
    assert_eq!(
        from_snapshot.text(kwic_core::Span::new(0, 3)),
        "the fox runs"
    );
    assert_eq!(from_snapshot.subdocuments("s"), from_json.subdocuments("s"));
}

#[test]
fn missing_corpus_is_usage_error() {
    let err = load_corpus(None).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
}

#[test]
fn unreadable_corpus_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_corpus(Some(&path)).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn garbage_snapshot_is_corpus_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.kwc");
    fs::write(&path, b"not a snapshot").unwrap();

    let err = load_corpus(Some(&path)).unwrap_err();
    assert!(matches!(err, CliError::Corpus { .. }));
}

#[test]
fn inline_query_wins_over_path() {
    let source =
        load_query_source(Some(&PathBuf::from("ignored.kwic")), Some("[pos=noun]")).unwrap();
    assert_eq!(source.text, "[pos=noun]");
    assert_eq!(source.name, None);
}

#[test]
fn query_from_file_keeps_its_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nouns.kwic");
    fs::write(&path, "[pos=noun]\n").unwrap();

    let source = load_query_source(Some(&path), None).unwrap();
    assert_eq!(source.text, "[pos=noun]\n");
    assert!(source.name.unwrap().ends_with("nouns.kwic"));
}

#[test]
fn missing_query_is_usage_error() {
    let err = load_query_source(None, None).unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
}
